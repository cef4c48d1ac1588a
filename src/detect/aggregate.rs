use super::ImagePattern;
use std::collections::HashMap;

/// Merge findings that share a `(path, value)` key, summing their counts.
///
/// Output keeps first-appearance order; sort explicitly when order matters.
pub fn aggregate(patterns: Vec<ImagePattern>) -> Vec<ImagePattern> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut merged: Vec<ImagePattern> = Vec::with_capacity(patterns.len());

    for pattern in patterns {
        let key = (pattern.path.clone(), pattern.value.clone());
        match index.get(&key) {
            Some(&pos) => merged[pos].count += pattern.count.max(1),
            None => {
                index.insert(key, merged.len());
                merged.push(ImagePattern {
                    count: pattern.count.max(1),
                    ..pattern
                });
            }
        }
    }

    merged
}
