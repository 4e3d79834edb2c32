//! One analyzer shared by many threads.

use std::sync::Arc;
use std::thread;

use ntest::timeout;
use rayon::prelude::*;

use routeconf_core::{Analyzer, Directive};

use super::helpers::*;

#[timeout(5000)]
#[test]
fn test_parallel_analysis_matches_sequential() {
    let analyzer = Analyzer::default();
    let requests: Vec<_> = (0..512u64)
        .map(|i| {
            let name = format!("db{}", i % 17);
            match i % 4 {
                0 => patch(
                    ocn_target(&name, &i.to_string()),
                    &[("addr", "'10.0.0.5:5432'"), ("lock", "'true'")],
                ),
                1 => create(one_target(&name), &[("dbnameIn", "fdr")]),
                2 => get(one_target(&name)),
                _ => delete(ocn_target(&name, "bogus")),
            }
        })
        .collect();

    let sequential: Vec<_> = requests.iter().map(|r| analyzer.analyze(r)).collect();
    let parallel: Vec<_> = requests.par_iter().map(|r| analyzer.analyze(r)).collect();
    assert_eq!(sequential, parallel);

    let errors = parallel.iter().filter(|r| r.is_err()).count();
    assert_eq!(errors, 128);
}

#[timeout(5000)]
#[test]
fn test_shared_analyzer_across_threads() {
    let analyzer = Arc::new(Analyzer::default());
    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let analyzer = Arc::clone(&analyzer);
            thread::spawn(move || {
                (0..100u64)
                    .map(|i| {
                        let ocn = (t * 1000 + i).to_string();
                        let req = patch(ocn_target("fdr", &ocn), &[("addr", "'[::1]:5432'")]);
                        match analyzer.analyze(&req) {
                            Ok(Directive::Patch(d)) => d.target.ocn,
                            other => panic!("unexpected result: {:?}", other),
                        }
                    })
                    .sum::<u64>()
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        let t = t as u64;
        let expected: u64 = (0..100u64).map(|i| t * 1000 + i).sum();
        assert_eq!(handle.join().unwrap(), expected);
    }
}
