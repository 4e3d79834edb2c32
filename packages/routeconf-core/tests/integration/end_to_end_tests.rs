//! End-to-end analysis scenarios: request in, directive or diagnostic out.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use pretty_assertions::assert_eq;

use routeconf_core::addr::{AddrResolver, Network, ServiceRegistry};
use routeconf_core::directive::{Directive, PatchDirective};
use routeconf_core::target::{TargetOcn, TargetOne};
use routeconf_core::{analyze, Analyzer, Anchored, AttrChange, HasPosition, Position};

use super::helpers::*;

/// Patch fdr@7 to a new address; nothing else changes.
#[test]
fn test_patch_scenario() {
    let req = patch(ocn_target("fdr", "7"), &[("addr", "'10.0.0.5:5432'")]);
    let directive = analyze(&req).unwrap();

    let value_token = tok("'10.0.0.5:5432'", 2, 12);
    let expected = Directive::Patch(PatchDirective {
        pos: Position::new(1, 1),
        target: TargetOcn {
            pos: Position::new(1, 7),
            one: TargetOne {
                pos: Position::new(1, 7),
                name: "fdr".to_string(),
            },
            ocn: 7,
        },
        change: AttrChange {
            addr: Some(Anchored::new(
                &value_token,
                SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)), 5432),
            )),
            ..Default::default()
        },
    });
    assert_eq!(directive, expected);
    assert_eq!(directive.ocn_guard(), Some(("fdr", 7)));
    assert_eq!(directive.change().unwrap().requested_fields(), vec!["addr"]);
}

/// A versioned target given to create is refused outright.
#[test]
fn test_create_with_ocn_target_scenario() {
    let req = create(ocn_target("fdr", "7"), &[("addr", "'10.0.0.5:5432'")]);
    let err = analyze(&req).unwrap_err();

    assert!(err.is_bad_target());
    assert_eq!(err.position(), Position::new(1, 7));
    assert_eq!(
        err.to_string(),
        "1:7: Incorrect target type for create: expected a named target, got a versioned target"
    );
}

#[test]
fn test_hostname_address_is_never_resolved() {
    let req = create(one_target("fdr"), &[("addr", "'db.example.com:5432'")]);
    let err = analyze(&req).unwrap_err();

    assert!(!err.is_bad_target());
    assert_eq!(err.position(), Position::new(2, 12));
    assert!(err.to_string().starts_with("2:12: Invalid addr 'db.example.com:5432'"));
}

#[test]
fn test_lock_literal_boundaries() {
    let lock_of = |literal: &str| {
        analyze(&patch(ocn_target("fdr", "3"), &[("lock", literal)]))
            .map(|d| *d.change().unwrap().lock.as_ref().unwrap().value())
    };

    assert_eq!(lock_of("'true'").unwrap(), true);
    assert_eq!(lock_of("'false'").unwrap(), false);

    let err = lock_of("'yes'").unwrap_err();
    assert!(err.message().contains("'yes'"), "{err}");
    assert_eq!(err.position(), Position::new(2, 12));
}

#[test]
fn test_every_action_target_pair() {
    let shapes = || vec![all_target(), one_target("fdr"), ocn_target("fdr", "9")];

    let legal: Vec<bool> = shapes()
        .into_iter()
        .map(|t| analyze(&patch(t, &[])).is_ok())
        .collect();
    assert_eq!(legal, vec![false, false, true]);

    let legal: Vec<bool> = shapes()
        .into_iter()
        .map(|t| analyze(&create(t, &[])).is_ok())
        .collect();
    assert_eq!(legal, vec![false, true, false]);

    let legal: Vec<bool> = shapes().into_iter().map(|t| analyze(&get(t)).is_ok()).collect();
    assert_eq!(legal, vec![true, true, false]);

    let legal: Vec<bool> = shapes()
        .into_iter()
        .map(|t| analyze(&delete(t)).is_ok())
        .collect();
    assert_eq!(legal, vec![true, true, true]);
}

#[test]
fn test_rejections_are_bad_target_class() {
    let rejected = [
        patch(all_target(), &[]),
        patch(one_target("fdr"), &[]),
        create(all_target(), &[]),
        create(ocn_target("fdr", "1"), &[]),
        get(ocn_target("fdr", "1")),
    ];
    for req in &rejected {
        let err = analyze(req).unwrap_err();
        assert!(err.is_bad_target(), "{err}");
        assert_eq!(err.position(), req.target.position());
    }
}

#[test]
fn test_service_name_port_from_custom_registry() {
    let analyzer = Analyzer::with_resolver(AddrResolver::new(
        Network::Tcp,
        ServiceRegistry::from_services_text("pgbouncer 6432/tcp pooler\n"),
    ));
    let req = create(one_target("fdr"), &[("addr", "'[::1]:pooler'")]);
    let directive = analyzer.analyze(&req).unwrap();

    let addr = directive.change().unwrap().addr.as_ref().unwrap();
    assert_eq!(addr.value().port(), 6432);
    assert!(addr.value().is_ipv6());
}
