use filectx_typemap::{
    GeometryProfile, MappingCache, MappingError, MappingRuleKind, StockComparerFactory,
    StoredValue, TypeDescriptor, TypeMapping, TypeMappingResolver, ValueComparer, well_known,
};
use std::cmp::Ordering;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const ROUNDS: usize = 200;

/// What a single-threaded resolve reports for one descriptor.
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    rule: MappingRuleKind,
    plain: bool,
    shared: bool,
    comparer: Option<String>,
}

fn outcome(resolver: &TypeMappingResolver, descriptor: &TypeDescriptor) -> Outcome {
    let mapping = resolver.resolve(descriptor).expect("every sample type resolves");
    Outcome {
        rule: resolver.classify(descriptor),
        plain: mapping.is_plain(),
        shared: mapping.shares_one_comparer(),
        comparer: mapping.equality_comparer().map(|comparer| comparer.name()),
    }
}

fn samples() -> Vec<TypeDescriptor> {
    let marker = TypeDescriptor::reference(well_known::GEOMETRY_MARKER);
    let point = TypeDescriptor::extends("NetTopologySuite.Geometries.Point", &marker);
    vec![
        TypeDescriptor::value("System.Int32"),
        TypeDescriptor::value("System.DateTime"),
        TypeDescriptor::string(),
        TypeDescriptor::bytes(),
        point.clone(),
        TypeDescriptor::extends("Acme.Spatial.Waypoint", &point),
        TypeDescriptor::reference("Shop.Customer"),
        TypeDescriptor::reference("Shop.Order"),
    ]
}

fn resolver() -> TypeMappingResolver {
    TypeMappingResolver::new(
        Arc::new(
            StockComparerFactory::with_builtin_profiles()
                .with_profile("Acme.Spatial.Waypoint", GeometryProfile { tolerance: 1e-6 }),
        ),
        Arc::new(|descriptor: &TypeDescriptor| {
            Ok::<_, MappingError>(TypeMapping::plain(descriptor))
        }),
    )
}

#[test]
fn concurrent_resolution_matches_single_threaded_results() {
    let resolver = resolver();
    let samples = samples();
    let expected: Vec<Outcome> = samples
        .iter()
        .map(|descriptor| outcome(&resolver, descriptor))
        .collect();

    thread::scope(|scope| {
        for worker in 0..THREADS {
            let resolver = &resolver;
            let samples = &samples;
            let expected = &expected;
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let index = (worker + round) % samples.len();
                    assert_eq!(outcome(resolver, &samples[index]), expected[index]);
                }
            });
        }
    });
}

#[test]
fn byte_comparers_stay_correct_under_contention() {
    let resolver = resolver();
    let bytes = TypeDescriptor::bytes();

    thread::scope(|scope| {
        for worker in 0..THREADS {
            let resolver = &resolver;
            let bytes = &bytes;
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let mapping = resolver.resolve(bytes).expect("bytes");
                    let seed = ((worker + round) % 250) as u8;
                    let longer = StoredValue::Bytes(vec![seed, seed + 1, seed + 2]);
                    let shorter = StoredValue::Bytes(vec![seed, seed + 1]);
                    assert!(mapping.values_equal(&longer, &longer.clone()));
                    assert!(!mapping.values_equal(&longer, &shorter));
                    assert_eq!(mapping.compare_values(&shorter, &longer), Ordering::Less);
                }
            });
        }
    });
}

#[test]
fn shared_cache_converges_on_one_mapping_per_type() {
    let cache = MappingCache::new(Arc::new(resolver()));
    let samples = samples();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let cache = &cache;
            let samples = &samples;
            scope.spawn(move || {
                for _ in 0..ROUNDS / 10 {
                    for descriptor in samples {
                        cache.get_or_resolve(descriptor).expect("cached resolve");
                    }
                }
            });
        }
    });

    let stats = cache.stats();
    assert_eq!(stats.entries, samples.len());
    assert_eq!(
        stats.hits + stats.misses,
        (THREADS * (ROUNDS / 10) * samples.len()) as u64
    );

    for descriptor in samples.iter().filter(|d| !d.is_value_type()) {
        let first = cache.get_or_resolve(descriptor).expect("first");
        let second = cache.get_or_resolve(descriptor).expect("second");
        if let (Some(a), Some(b)) = (first.equality_comparer(), second.equality_comparer()) {
            assert!(Arc::ptr_eq(a, b), "{descriptor} comparer changed");
        }
    }
}
