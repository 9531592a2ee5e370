//! Property-based tests of hierarchy structure and query equivalence.

use bvh_tree::{Aabb, Bvh, BvhConfig, BvhHitInfo, CentroidMedian, MeshBvh, Ray, Triangle};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn point() -> impl Strategy<Value = Point3<f32>> {
    (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

/// Small triangles scattered in a 20-unit cube, plus the occasional
/// degenerate one: a repeated vertex or three collinear vertices.
fn triangle() -> impl Strategy<Value = Triangle> {
    (point(), point(), point(), 0.05f32..3.0, 0u8..8, -1.5f32..1.5).prop_map(
        |(a, b, c, scale, kind, along)| {
            let b = a + (b - a) * (scale / 20.0);
            let c = match kind {
                0 => a,
                1 => a + (b - a) * along,
                _ => a + (c - a) * (scale / 20.0),
            };
            Triangle::new(a, b, c)
        },
    )
}

/// Three vertices on one segment, in any order along it.
fn collinear_triangle() -> impl Strategy<Value = (Triangle, Point3<f32>, Vector3<f32>)> {
    (point(), point(), 0.1f32..0.9, any::<bool>()).prop_map(|(a, end, k, swap)| {
        let d = end - a;
        let middle = a + d * k;
        let triangle = if swap {
            Triangle::new(a, a + d, middle)
        } else {
            Triangle::new(a, middle, a + d)
        };
        (triangle, a, d)
    })
}

fn mesh(max_len: usize) -> impl Strategy<Value = Vec<Triangle>> {
    prop::collection::vec(triangle(), 0..max_len)
}

fn ray() -> impl Strategy<Value = Ray> {
    // Origins reach outside the mesh's cube so that some rays miss entirely.
    (point(), point()).prop_filter_map("direction must be non-zero", |(origin, target)| {
        let origin = origin * 1.5;
        let direction = target - origin;
        (direction.norm() > 1e-3).then(|| Ray::new(origin, direction))
    })
}

fn brute_force(triangles: &[Triangle], ray: &Ray) -> Option<(f32, usize)> {
    triangles
        .iter()
        .enumerate()
        .filter_map(|(i, tri)| tri.intersect_ray(ray).map(|t| (t, i)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

fn bounds_of(triangles: &[Triangle]) -> Vec<Aabb> {
    triangles.iter().map(Triangle::bounds).collect()
}

/// The hit must carry the scan's minimum distance, its triangle must
/// reproduce that distance, and a unique minimum must name the same triangle.
fn agrees(
    triangles: &[Triangle],
    ray: &Ray,
    expected: Option<(f32, usize)>,
    actual: Option<BvhHitInfo>,
) -> bool {
    match (expected, actual) {
        (None, None) => true,
        (Some((t, index)), Some(hit)) => {
            let reproduced = triangles[hit.triangle_index()].intersect_ray(ray) == Some(t);
            let tied = triangles
                .iter()
                .filter(|tri| tri.intersect_ray(ray) == Some(t))
                .count();
            hit.distance() == t && reproduced && (tied > 1 || hit.triangle_index() == index)
        }
        _ => false,
    }
}

/// Random mesh from a fixed seed, for tests that need many triangles.
fn seeded_mesh(seed: u64, n: usize) -> Vec<Triangle> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let a = Point3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let mut offset = || {
                Vector3::new(
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                )
            };
            let (u, v) = (offset(), offset());
            Triangle::new(a, a + u, a + v)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every node contains its primitives and children split their parent exactly.
    #[test]
    fn structure_is_valid(triangles in mesh(200)) {
        let bounds = bounds_of(&triangles);

        let bvh = Bvh::build(&triangles);
        prop_assert_eq!(bvh.validate(&bounds), Ok(()));

        let median = Bvh::build_with(&triangles, &BvhConfig::default(), &CentroidMedian);
        prop_assert_eq!(median.validate(&bounds), Ok(()));
    }

    /// The primitive index array is a permutation of `0..n`.
    #[test]
    fn indices_are_a_permutation(triangles in mesh(200)) {
        let bvh = Bvh::build(&triangles);
        let mut indices = bvh.primitive_indices().to_vec();
        indices.sort_unstable();
        prop_assert_eq!(indices, (0..triangles.len()).collect::<Vec<_>>());
    }

    /// Nearest-hit queries agree with an exhaustive scan.
    #[test]
    fn closest_hit_matches_brute_force(triangles in mesh(120), rays in prop::collection::vec(ray(), 1..16)) {
        let bvh = Bvh::build(&triangles);
        let median = Bvh::build_with(
            &triangles,
            &BvhConfig::default().with_min_leaf_size(1),
            &CentroidMedian,
        );

        for ray in &rays {
            let expected = brute_force(&triangles, ray);

            let actual = bvh.closest_hit(&triangles, ray);
            prop_assert!(agrees(&triangles, ray, expected, actual), "expected {:?}, got {:?}", expected, actual);

            let actual = median.closest_hit(&triangles, ray);
            prop_assert!(agrees(&triangles, ray, expected, actual), "expected {:?}, got {:?}", expected, actual);

            prop_assert_eq!(bvh.any_hit(&triangles, ray), expected.is_some());
        }
    }

    /// Collinear triangles never report a hit, alone or inside a hierarchy.
    #[test]
    fn collinear_triangles_never_hit(
        (triangle, a, d) in collinear_triangle(),
        s in 0.0f32..=1.0,
        origin in point(),
    ) {
        let target = a + d * s;
        let direction = target - origin;
        prop_assume!(direction.norm() > 1e-3);
        let ray = Ray::new(origin, direction);

        prop_assert!(triangle.is_degenerate());
        prop_assert_eq!(triangle.intersect_ray(&ray), None);

        let mesh = MeshBvh::from_triangles(vec![triangle; 5]);
        prop_assert!(mesh.validate().is_ok());
        prop_assert!(mesh.query(&ray).is_none());
        prop_assert!(!mesh.query_any(&ray));
    }

    /// Building twice yields identical arenas and index arrays.
    #[test]
    fn build_is_deterministic(triangles in mesh(150)) {
        prop_assert_eq!(Bvh::build(&triangles), Bvh::build(&triangles));
    }

    /// Box queries agree with a linear scan.
    #[test]
    fn overlapping_matches_scan(triangles in mesh(120), a in point(), b in point()) {
        let query = Aabb::new(a, b);
        let bvh = Bvh::build(&triangles);

        let expected: Vec<usize> = (0..triangles.len())
            .filter(|&i| triangles[i].bounds().intersects(&query))
            .collect();
        prop_assert_eq!(bvh.overlapping(&triangles, &query), expected);
    }
}

#[test]
fn scenario_single_triangle() {
    let mesh = MeshBvh::from_triangles(vec![Triangle::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    )]);

    let hit = mesh
        .query(&Ray::new(Point3::new(0.2, 0.2, 5.0), Vector3::new(0.0, 0.0, -1.0)))
        .unwrap();
    assert!((hit.distance() - 5.0).abs() < 1e-6);
    assert_eq!(hit.triangle_index(), 0);

    let miss = mesh.query(&Ray::new(Point3::new(5.0, 5.0, 5.0), Vector3::new(0.0, 0.0, -1.0)));
    assert!(miss.is_none());
}

#[test]
fn scenario_empty_mesh() {
    let mesh = MeshBvh::from_triangles(Vec::new());
    for direction in [Vector3::x(), Vector3::y(), -Vector3::z(), Vector3::zeros()] {
        let ray = Ray::new(Point3::origin(), direction);
        assert!(mesh.query(&ray).is_none());
        assert!(!mesh.query_any(&ray));
    }
}

#[test]
fn large_seeded_mesh_matches_brute_force() {
    let triangles = seeded_mesh(7, 5_000);
    let bvh = Bvh::build(&triangles);
    assert_eq!(bvh.validate(&bounds_of(&triangles)), Ok(()));
    assert!(bvh.depth() < BvhConfig::default().max_depth);

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let origin = Point3::new(
            rng.gen_range(-80.0..80.0),
            rng.gen_range(-80.0..80.0),
            rng.gen_range(-80.0..80.0),
        );
        let target = Point3::new(
            rng.gen_range(-40.0..40.0),
            rng.gen_range(-40.0..40.0),
            rng.gen_range(-40.0..40.0),
        );
        let ray = Ray::new(origin, target - origin);

        let expected = brute_force(&triangles, &ray);
        let actual = bvh.closest_hit(&triangles, &ray);
        assert!(agrees(&triangles, &ray, expected, actual), "expected {expected:?}, got {actual:?}");
    }
}

#[test]
fn large_seeded_mesh_is_deterministic() {
    let triangles = seeded_mesh(42, 2_000);
    let a = Bvh::build(&triangles);
    let b = Bvh::build(&triangles);

    assert_eq!(a.nodes().as_slice(), b.nodes().as_slice());
    assert_eq!(a.primitive_indices(), b.primitive_indices());
}
