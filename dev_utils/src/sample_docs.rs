//! Builders of divan-shaped JSON documents.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Map, Value};

/// One data point: `(query, variant, scale factor key, [fastest, mean, median, slowest])`.
pub type Point<'a> = (&'a str, &'a str, &'a str, [f64; 4]);

pub fn leaf(quad: [f64; 4]) -> Value {
    let [fastest, mean, median, slowest] = quad;
    json!({
        "time": { "fastest": fastest, "mean": mean, "median": median, "slowest": slowest },
        "alloc_tallies": { "alloc": { "count": 0, "size": 0 } }
    })
}

fn object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut().expect("just made an object")
}

fn child<'a>(parent: &'a mut Value, key: &str) -> &'a mut Value {
    object(parent)
        .entry(key.to_owned())
        .or_insert_with(|| Value::Object(Map::new()))
}

/// Nested document with the given points, in order.
pub fn document(points: &[Point]) -> Value {
    let mut doc = Value::Object(Map::new());
    for (query, variant, sf, quad) in points {
        let variant_node = child(child(&mut doc, query), variant);
        object(variant_node).insert(sf.to_string(), leaf(*quad));
    }
    doc
}

/// Adds a leaf without timing at `query/variant/sf`.
pub fn add_untimed(doc: &mut Value, query: &str, variant: &str, sf: &str) {
    let variant_node = child(child(doc, query), variant);
    object(variant_node).insert(sf.to_owned(), json!({ "alloc_tallies": {} }));
}

/// `{"q1": {"v1": {"10": {"time": {1, 2, 2, 3}}}}}`.
pub fn single_point() -> Value {
    document(&[("q1", "v1", "10", [1.0, 2.0, 2.0, 3.0])])
}

/// Wraps benchmark groups the way a combined divan output file does.
pub fn tables_file(groups: Value) -> Value {
    json!({ "benchmarks": { "tables": groups } })
}

/// One line of a combined workspace output file.
pub fn ndjson_line(benchmarks: &[(&str, Value)]) -> String {
    let map: Map<String, Value> = benchmarks
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    json!({ "benchmarks": map }).to_string()
}

/// Shape of a random document.
#[derive(Debug, Clone)]
pub struct DocShape {
    pub queries: Vec<String>,
    pub variants: Vec<String>,
    pub scale_factors: Vec<u64>,
    pub seed: u64,
}

impl DocShape {
    pub fn new(n_queries: usize, n_variants: usize, scale_factors: &[u64]) -> Self {
        Self {
            queries: (0..n_queries).map(|i| format!("q{i}")).collect(),
            variants: (0..n_variants).map(|i| format!("v{i}")).collect(),
            scale_factors: scale_factors.to_vec(),
            seed: 42,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.queries.len() * self.variants.len() * self.scale_factors.len()
    }
}

/// Random well-ordered quadruple (`fastest <= median, mean <= slowest`) around `base` ps.
pub fn random_quad(rng: &mut impl Rng, base: f64) -> [f64; 4] {
    let fastest = base * rng.gen_range(0.5..1.0);
    let median = fastest * rng.gen_range(1.0..1.5);
    let mean = fastest * rng.gen_range(1.0..1.5);
    let slowest = median.max(mean) * rng.gen_range(1.0..2.0);
    [fastest, mean, median, slowest]
}

/// Document with every combination of `shape`, timings growing with the scale factor.
pub fn random_document(shape: &DocShape) -> Value {
    let mut rng = StdRng::seed_from_u64(shape.seed);
    let mut doc = Value::Object(Map::new());
    for query in &shape.queries {
        for variant in &shape.variants {
            for sf in &shape.scale_factors {
                let quad = random_quad(&mut rng, 1000.0 * (*sf as f64 + 1.0));
                let variant_node = child(child(&mut doc, query), variant);
                object(variant_node).insert(sf.to_string(), leaf(quad));
            }
        }
    }
    doc
}
