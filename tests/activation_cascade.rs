use cable_forge::{
    CableId, CablePath, CablePoint, CableRegistry, Combinator, GraphError, MeshGenerator, Scene,
    SUBMESH_GLOW,
};
use cgmath::Vector3;

fn straight(z: f32) -> CablePath {
    CablePath::from_points(vec![
        CablePoint::new(Vector3::new(0.0, 0.0, z), Vector3::unit_y()),
        CablePoint::new(Vector3::new(3.0, 0.0, z), Vector3::unit_y()),
    ])
}

fn generations(registry: &CableRegistry, ids: &[CableId]) -> Vec<u64> {
    ids.iter()
        .map(|id| registry.cable(*id).map(|cable| cable.generations()).unwrap_or(0))
        .collect()
}

#[test]
fn toggling_a_source_cascades_through_or_and() {
    let mut registry = CableRegistry::new();
    let generator = MeshGenerator::default();
    let a = registry
        .add_cable("a", straight(0.0), Combinator::None, true, generator)
        .unwrap();
    let b = registry
        .add_cable("b", straight(1.0), Combinator::Or, false, generator)
        .unwrap();
    let c = registry
        .add_cable("c", straight(2.0), Combinator::And, false, generator)
        .unwrap();
    registry.link(b, a).unwrap();
    registry.link(c, b).unwrap();
    assert!(registry.is_active(b) && registry.is_active(c));

    let before = generations(&registry, &[a, b, c]);
    let rebuilt = registry.set_active(a, false).unwrap();
    assert_eq!(rebuilt, vec![a, b, c]);
    let after = generations(&registry, &[a, b, c]);
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(new - old, 1);
    }
    for id in [a, b, c] {
        assert!(!registry.is_active(id));
        assert!(!registry
            .mesh(id)
            .unwrap()
            .submeshes
            .contains_key(&SUBMESH_GLOW));
    }

    // setting the same value again touches nothing
    assert!(registry.set_active(a, false).unwrap().is_empty());
    assert_eq!(generations(&registry, &[a, b, c]), after);
}

#[test]
fn derived_cables_refuse_direct_toggles() {
    let mut registry = CableRegistry::new();
    let generator = MeshGenerator::default();
    let or = registry
        .add_cable("or", straight(0.0), Combinator::Or, false, generator)
        .unwrap();
    let before = generations(&registry, &[or]);
    assert_eq!(registry.set_active(or, true), Err(GraphError::NotSettable(or)));
    assert!(!registry.is_active(or));
    assert_eq!(generations(&registry, &[or]), before);
}

#[test]
fn passthrough_mirrors_and_misconfiguration_reads_true() {
    let scene = Scene::from_json(
        r#"{ "cables": [
            { "name": "src", "points": [ { "position": [0, 0, 0] }, { "position": [1, 0, 0] } ] },
            { "name": "alt", "active": true,
              "points": [ { "position": [0, 0, 1] }, { "position": [1, 0, 1] } ] },
            { "name": "mirror", "combinator": "passthrough", "extends": ["src"],
              "points": [ { "position": [1, 0, 0] }, { "position": [2, 0, 0] } ] },
            { "name": "odd", "combinator": "passthrough", "extends": ["src", "alt"],
              "points": [ { "position": [1, 0, 1] }, { "position": [2, 0, 1] } ] },
            { "name": "weird", "combinator": "xor",
              "points": [ { "position": [3, 0, 0] }, { "position": [4, 0, 0] } ] }
        ] }"#,
    )
    .unwrap();
    let mut registry = scene.build().unwrap();
    let src = registry.id_by_name("src").unwrap();
    let mirror = registry.id_by_name("mirror").unwrap();
    let odd = registry.id_by_name("odd").unwrap();

    assert!(!registry.is_active(mirror));
    assert!(registry.is_active(odd));

    registry.set_active_by_name("src", true).unwrap();
    assert!(registry.is_active(src));
    assert!(registry.is_active(mirror));
    assert!(registry.is_active(odd));

    let weird = registry.id_by_name("weird").unwrap();
    assert_eq!(registry.cable(weird).unwrap().combinator(), Combinator::Unknown);
    assert!(registry.is_active(weird));
    let mesh = registry.mesh(weird).unwrap();
    // no start cap for an unknown combinator, just the segment
    assert_eq!(mesh.triangle_count(0), 6);
    assert!(mesh.submeshes.contains_key(&SUBMESH_GLOW));
}

#[test]
fn unlinked_derived_cables_glow_from_their_combinator() {
    let scene = Scene::from_json(
        r#"{ "cables": [
            { "name": "gate", "combinator": "and", "active": false,
              "points": [ { "position": [0, 0, 0] }, { "position": [1, 0, 0] } ] },
            { "name": "relay", "combinator": "or", "active": true,
              "points": [ { "position": [0, 0, 1] }, { "position": [1, 0, 1] } ] }
        ] }"#,
    )
    .unwrap();
    let registry = scene.build().unwrap();
    let gate = registry.id_by_name("gate").unwrap();
    let relay = registry.id_by_name("relay").unwrap();
    assert!(registry.is_active(gate));
    assert!(registry.mesh(gate).unwrap().submeshes.contains_key(&SUBMESH_GLOW));
    assert!(!registry.is_active(relay));
    assert!(!registry.mesh(relay).unwrap().submeshes.contains_key(&SUBMESH_GLOW));
}

#[test]
fn loops_are_refused_and_graph_stays_intact() {
    let mut registry = CableRegistry::new();
    let generator = MeshGenerator::default();
    let a = registry
        .add_cable("a", straight(0.0), Combinator::Or, false, generator)
        .unwrap();
    let b = registry
        .add_cable("b", straight(1.0), Combinator::Or, false, generator)
        .unwrap();
    registry.link(b, a).unwrap();
    assert_eq!(
        registry.link(a, b),
        Err(GraphError::Cycle { node: a, upstream: b })
    );
    assert_eq!(registry.link(a, a), Err(GraphError::SelfEdge(a)));
    assert!(registry.graph().upstreams(a).is_empty());
    assert_eq!(registry.graph().upstreams(b), &[a]);

    registry.unlink(b, a).unwrap();
    assert!(registry.graph().upstreams(b).is_empty());
}
