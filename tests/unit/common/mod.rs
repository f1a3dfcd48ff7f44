//! Shared test fixtures and helpers
//!
//! This module provides common utilities for testing dirload.

use std::fs;
use std::path::Path;

use dirload::ModuleError;
use tempfile::TempDir;

/// A temporary application tree with a standard layout
pub struct TestApp {
    dir: TempDir,
}

impl TestApp {
    /// Create a new application tree:
    /// ```text
    /// /
    /// ├── test/
    /// │   ├── Test.test.ts
    /// │   ├── Test2.test.ts
    /// │   ├── Test3.test.ts
    /// │   └── helper.ts
    /// ├── routes/
    /// │   ├── user.ts
    /// │   ├── user.d.ts
    /// │   ├── admin/
    /// │   │   └── panel.js
    /// │   └── node_modules/
    /// │       └── dep/index.js
    /// └── README.md
    /// ```
    pub fn new() -> Self {
        let app = Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        };

        app.add_file("test/Test.test.ts", "export default 'Test';\n");
        app.add_file("test/Test2.test.ts", "export default 'Test2';\n");
        app.add_file("test/Test3.test.ts", "export default 'Test3';\n");
        app.add_file("test/helper.ts", "export const helper = 1;\n");
        app.add_file("routes/user.ts", "export default { path: '/users' };\n");
        app.add_file("routes/user.d.ts", "export {};\n");
        app.add_file("routes/admin/panel.js", "module.exports = {};\n");
        app.add_file("routes/node_modules/dep/index.js", "module.exports = {};\n");
        app.add_file("README.md", "# App\n");

        app
    }

    /// Get the root path of the application tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories
    pub fn add_file(&self, path: &str, content: &str) {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Loader that reads a file and fails when it contains `throw`
pub fn throwing_loader(path: &Path) -> Result<String, ModuleError> {
    let content = fs::read_to_string(path)?;
    if content.contains("throw") {
        return Err(ModuleError::rejected(format!("{} threw while loading", path.display())));
    }
    Ok(content)
}
