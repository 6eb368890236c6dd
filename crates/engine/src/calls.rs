//! Legacy and secure file API members the rewrite knows about.

use patterns::{Arity, MethodMatcher};
use std::sync::OnceLock;

pub const JAVA_IO_FILE: &str = "java.io.File";
pub const JAVA_NIO_FILE_FILES: &str = "java.nio.file.Files";
pub const JAVA_NIO_FILE_PATH: &str = "java.nio.file.Path";

/// First language level shipping `java.nio.file.Files`.
pub const SECURE_API_JAVA_VERSION: u32 = 7;

fn matcher(cell: &'static OnceLock<MethodMatcher>, name: &str, arity: Arity) -> &'static MethodMatcher {
    cell.get_or_init(|| MethodMatcher::new(JAVA_IO_FILE, name, arity))
}

/// `java.io.File createTempFile(..)`
pub fn create_temp_file() -> &'static MethodMatcher {
    static M: OnceLock<MethodMatcher> = OnceLock::new();
    matcher(&M, "createTempFile", Arity::Any)
}

/// `java.io.File delete()`
pub fn delete() -> &'static MethodMatcher {
    static M: OnceLock<MethodMatcher> = OnceLock::new();
    matcher(&M, "delete", Arity::Exact(Vec::new()))
}

/// `java.io.File mkdir()`
pub fn mkdir() -> &'static MethodMatcher {
    static M: OnceLock<MethodMatcher> = OnceLock::new();
    matcher(&M, "mkdir", Arity::Exact(Vec::new()))
}

/// `java.io.File mkdirs()`
pub fn mkdirs() -> &'static MethodMatcher {
    static M: OnceLock<MethodMatcher> = OnceLock::new();
    matcher(&M, "mkdirs", Arity::Exact(Vec::new()))
}
