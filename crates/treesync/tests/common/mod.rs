//! Shared helpers for integration tests: a seeded random tree generator
//! and a random mutator that edits trees through the engine's own
//! primitives.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value};
use treesync::value;

const KEYS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "items", "name", "value", "flag", "meta",
];
const WORDS: &[&str] = &["red", "green", "blue", "umbra", "sync", "halt"];

pub struct TreeGen {
    rng: StdRng,
}

impl TreeGen {
    pub fn new(seed: u64) -> Self {
        TreeGen {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A random object-rooted tree, up to three levels deep.
    pub fn tree(&mut self) -> Value {
        self.object(2)
    }

    fn node(&mut self, depth: usize) -> Value {
        let roll = self.rng.gen_range(0..100u32);
        if depth > 0 && roll < 20 {
            self.object(depth - 1)
        } else if depth > 0 && roll < 40 {
            self.array(depth - 1)
        } else {
            self.primitive()
        }
    }

    fn object(&mut self, depth: usize) -> Value {
        let len = self.rng.gen_range(0..5);
        let mut map = Map::new();
        for _ in 0..len {
            let key = KEYS[self.rng.gen_range(0..KEYS.len())].to_string();
            let child = self.node(depth);
            map.insert(key, child);
        }
        Value::Object(map)
    }

    fn array(&mut self, depth: usize) -> Value {
        let len = self.rng.gen_range(0..4);
        Value::Array((0..len).map(|_| self.node(depth)).collect())
    }

    fn primitive(&mut self) -> Value {
        match self.rng.gen_range(0..4u32) {
            0 => Value::Null,
            1 => json!(self.rng.gen_bool(0.5)),
            2 => json!(self.rng.gen_range(-100..100)),
            _ => json!(WORDS[self.rng.gen_range(0..WORDS.len())]),
        }
    }

    /// A related tree: a clone of `base` with a handful of random edits
    /// applied through `value::set` / `value::remove`.
    pub fn mutate(&mut self, base: &Value) -> Value {
        let mut out = base.clone();
        for _ in 0..self.rng.gen_range(1..6) {
            let mut paths = Vec::new();
            collect_paths("", &out, &mut paths);
            if paths.is_empty() {
                value::set(&mut out, "fresh", self.primitive());
                continue;
            }
            let pick = self.rng.gen_range(0..paths.len());
            let path = paths[pick].clone();
            match self.rng.gen_range(0..10u32) {
                0..=4 => {
                    let leaf = self.primitive();
                    value::set(&mut out, &path, leaf);
                }
                5..=6 => {
                    let subtree = self.node(1);
                    value::set(&mut out, &path, subtree);
                }
                7..=8 => value::remove(&mut out, &path),
                _ => {
                    let key = KEYS[self.rng.gen_range(0..KEYS.len())];
                    let leaf = self.primitive();
                    value::set(&mut out, &format!("{path}/{key}"), leaf);
                }
            }
        }
        out
    }
}

fn collect_paths(base: &str, node: &Value, out: &mut Vec<String>) {
    let join = |key: String| {
        if base.is_empty() {
            key
        } else {
            format!("{base}/{key}")
        }
    };
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let path = join(key.clone());
                out.push(path.clone());
                collect_paths(&path, child, out);
            }
        }
        Value::Array(arr) => {
            for (idx, child) in arr.iter().enumerate() {
                let path = join(format!("{idx}[]"));
                out.push(path.clone());
                collect_paths(&path, child, out);
            }
        }
        _ => {}
    }
}
