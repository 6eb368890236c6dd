use regex::Regex;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, OnceLock};

static GLOB_CACHE: OnceLock<Mutex<GlobCache>> = OnceLock::new();

#[cfg(test)]
pub const GLOB_CACHE_CAPACITY: usize = 3;
#[cfg(not(test))]
pub const GLOB_CACHE_CAPACITY: usize = 256;

/// Glob identifying test sources.
pub const TEST_SOURCE_GLOB: &str = "**/test/**";

/// Least recently used cache of compiled globs.
struct GlobCache {
    map: HashMap<String, Regex>,
    order: VecDeque<String>,
    capacity: usize,
}

impl GlobCache {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&mut self, key: &str) -> Option<&Regex> {
        let pos = self.order.iter().position(|k| k == key)?;
        if let Some(k) = self.order.remove(pos) {
            self.order.push_back(k);
        }
        self.map.get(key)
    }

    fn insert(&mut self, key: String, value: Regex) {
        if let Some(pos) = self.order.iter().position(|k| k == &key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Translates a path glob into an anchored regex.
///
/// `**` crosses directory separators, `*` and `?` do not.
pub fn glob_to_regex(glob: &str) -> String {
    let mut re = String::from("^");
    let mut chars = glob.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                re.push_str(".*");
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            c => re.push_str(&regex::escape(&c.to_string())),
        }
    }
    re.push('$');
    re
}

/// Whether `candidate` matches `glob`. Backslashes in the candidate are
/// treated as separators.
pub fn path_matches(glob: &str, candidate: &str) -> bool {
    let candidate = candidate.replace('\\', "/");
    let cache = GLOB_CACHE.get_or_init(|| Mutex::new(GlobCache::new(GLOB_CACHE_CAPACITY)));
    let mut cache = cache.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(rx) = cache.get(glob) {
        return rx.is_match(&candidate);
    }
    match Regex::new(&glob_to_regex(glob)) {
        Ok(rx) => {
            let is_match = rx.is_match(&candidate);
            cache.insert(glob.to_string(), rx);
            is_match
        }
        Err(_) => false,
    }
}

/// Whether `source_path` lies in a test source tree.
pub fn is_test_source(source_path: &str) -> bool {
    path_matches(TEST_SOURCE_GLOB, source_path)
}

#[cfg(test)]
fn cache_len() -> usize {
    GLOB_CACHE
        .get()
        .map(|c| c.lock().unwrap_or_else(|e| e.into_inner()).len())
        .unwrap_or(0)
}
