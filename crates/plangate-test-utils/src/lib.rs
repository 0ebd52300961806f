//! Shared test utilities for plangate tests.
//!
//! Provides a builder for plan documents that satisfy the default rule set,
//! so each test only spells out the part it breaks, and a temporary
//! directory helper for filesystem-backed checks.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for markdown plan documents.
///
/// [`PlanFixture::complete`] passes every default quality and scope rule.
/// Sections are addressed by a prefix of their heading line, e.g. `"## 3."`.
#[derive(Debug, Clone)]
pub struct PlanFixture {
    title: String,
    sections: Vec<(String, String)>,
}

impl PlanFixture {
    /// A plan with no sections.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// A plan that satisfies the default rule set.
    pub fn complete() -> Self {
        Self::empty("# [20250101] health-endpoint 深度实施方案")
            .with_section(
                "## 0. 预检清单 (Pre-Flight Checklist)",
                "- [x] 当前环境可通过构建\n",
            )
            .with_section("## 1. 核心变更摘要", "- **目标**: 新增健康检查接口。\n")
            .with_section(
                "## 2. 涉及文件清单 (Scope)",
                &scope_table(&[("Create", "`src/health.rs`", "新增健康检查")]),
            )
            .with_section(
                "## 3. 核心数据结构与接口 (Data Structures & Interfaces)",
                "```rust\npub struct Health {\n    pub ok: bool,\n}\n```\n",
            )
            .with_section(
                "## 4. 详细实施步骤 (Implementation Details)",
                "### 步骤 1: handler\n```rust\npub fn health() -> Health {\n    Health { ok: true }\n}\n```\n",
            )
            .with_section("## 5. 验证策略", "- 运行 `cargo test`\n")
            .with_section(
                "## 5. 风险评估与回滚 (Risk & Rollback)",
                "- **Rollback**: `git checkout src/health.rs`\n",
            )
    }

    /// Append a section.
    pub fn with_section(mut self, heading: &str, body: &str) -> Self {
        self.sections.push((heading.to_string(), body.to_string()));
        self
    }

    /// Remove every section whose heading starts with `prefix`.
    pub fn without_section(mut self, prefix: &str) -> Self {
        self.sections.retain(|(heading, _)| !heading.starts_with(prefix));
        self
    }

    /// Replace the body of the first section whose heading starts with
    /// `prefix`.
    ///
    /// # Panics
    ///
    /// Panics if no section matches, which is a bug in the calling test.
    pub fn with_body(mut self, prefix: &str, body: &str) -> Self {
        let section = self
            .sections
            .iter_mut()
            .find(|(heading, _)| heading.starts_with(prefix))
            .unwrap_or_else(|| panic!("no section with heading prefix {prefix:?}"));
        section.1 = body.to_string();
        self
    }

    /// Append text to the body of the first section whose heading starts
    /// with `prefix`.
    ///
    /// # Panics
    ///
    /// Panics if no section matches.
    pub fn append(mut self, prefix: &str, text: &str) -> Self {
        let section = self
            .sections
            .iter_mut()
            .find(|(heading, _)| heading.starts_with(prefix))
            .unwrap_or_else(|| panic!("no section with heading prefix {prefix:?}"));
        section.1.push_str(text);
        self
    }

    /// Replace the files-in-scope table with `rows` of
    /// `(operation, path cell, note)`.
    pub fn scope_rows(self, rows: &[(&str, &str, &str)]) -> Self {
        self.with_body("## 2.", &scope_table(rows))
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.title);
        for (heading, body) in &self.sections {
            out.push('\n');
            out.push_str(heading);
            out.push('\n');
            out.push_str(body);
        }
        out
    }

    /// Render the plan into `dir/name` and return the path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.render())
            .unwrap_or_else(|e| panic!("failed to write plan {}: {e}", path.display()));
        path
    }
}

/// Render a files-in-scope table with a header and separator row.
pub fn scope_table(rows: &[(&str, &str, &str)]) -> String {
    let mut out = String::from("| 操作 | 文件路径 | 关键改动点 |\n| :--- | :--- | :--- |\n");
    for (op, path, note) in rows {
        out.push_str(&format!("| {op} | {path} | {note} |\n"));
    }
    out
}

/// A temporary directory that is removed when dropped.
pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create an empty file at `rel`, including parent directories.
    pub fn touch(&self, rel: &str) -> PathBuf {
        self.write(rel, "")
    }

    /// Write `content` to `rel`, including parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("failed to create {}: {e}", parent.display()));
        }
        std::fs::write(&path, content)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
        path
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
