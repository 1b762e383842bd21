//! Property-based tests for face building.
//!
//! Run with: cargo test -p face-topology -- proptest

use face_topology::{EdgeAdjacency, FaceKey, build_faces};
use face_types::{Landmark, Point3, landmarks_from_positions};
use hashbrown::HashSet;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_landmarks(count: usize) -> impl Strategy<Value = Vec<Landmark>> {
    prop::collection::vec(prop::array::uniform3(0.0..1.0f64), count).prop_map(|coords| {
        let points: Vec<Point3<f64>> = coords
            .into_iter()
            .map(|[x, y, z]| Point3::new(x, y, z))
            .collect();
        landmarks_from_positions(&points)
    })
}

/// Random directed pairs, some of them past the end of the landmark list.
fn arb_case() -> impl Strategy<Value = (Vec<Landmark>, Vec<(u32, u32)>)> {
    (3usize..24).prop_flat_map(|n| {
        let upper = n as u32 + 3;
        (
            arb_landmarks(n),
            prop::collection::vec((0..upper, 0..upper), 0..120),
        )
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_faces_are_unique((landmarks, pairs) in arb_case()) {
        let adj = EdgeAdjacency::from_pairs(pairs);
        let faces = build_faces(&landmarks, &adj);

        let keys: HashSet<FaceKey> = faces.iter().map(|&f| FaceKey::from(f)).collect();
        prop_assert_eq!(keys.len(), faces.len());
    }

    #[test]
    fn proptest_faces_are_directed_cycles((landmarks, pairs) in arb_case()) {
        let adj = EdgeAdjacency::from_pairs(pairs);

        for [a, b, c] in build_faces(&landmarks, &adj) {
            prop_assert!(adj.contains(a, b));
            prop_assert!(adj.contains(b, c));
            prop_assert!(adj.contains(c, a));
            prop_assert!(a != b && b != c && c != a);
        }
    }

    #[test]
    fn proptest_indices_in_range((landmarks, pairs) in arb_case()) {
        let adj = EdgeAdjacency::from_pairs(pairs);
        let n = landmarks.len() as u32;

        for face in build_faces(&landmarks, &adj) {
            prop_assert!(face.iter().all(|&i| i < n));
        }
    }

    #[test]
    fn proptest_leading_edge_used_once((landmarks, pairs) in arb_case()) {
        let adj = EdgeAdjacency::symmetric(pairs);
        let faces = build_faces(&landmarks, &adj);

        let leading: HashSet<(u32, u32)> = faces.iter().map(|f| (f[0], f[1])).collect();
        prop_assert_eq!(leading.len(), faces.len());
    }

    #[test]
    fn proptest_deterministic((landmarks, pairs) in arb_case()) {
        let adj = EdgeAdjacency::from_pairs(pairs);
        prop_assert_eq!(build_faces(&landmarks, &adj), build_faces(&landmarks, &adj));
    }
}

#[test]
fn acyclic_adjacency_yields_nothing() {
    // A directed path never closes a 3-cycle
    let landmarks = landmarks_from_positions(&vec![Point3::origin(); 50]);
    let adj = EdgeAdjacency::from_pairs((0..49).map(|i| (i, i + 1)));
    assert!(build_faces(&landmarks, &adj).is_empty());
}
