//! 仓库源码扫描器
//!
//! 在克隆出的源码树里收集待生成文档的代码文件。逐文件容错：
//! 读不了、二进制、非 UTF-8 的文件跳过，不中断整个扫描。

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// 纳入文档生成的扩展名
const CODE_EXTENSIONS: [&str; 7] = ["py", "js", "java", "c", "cpp", "h", "ts"];

/// 单文件内容上限（字节），超出部分截断
const MAX_FILE_BYTES: usize = 100_000;

/// 截断标记，追加在被截断文件的末尾
const TRUNCATION_MARKER: &str = "\n// ... [truncated due to size] ...";

/// 依赖产物等无须文档化的目录/文件模式
const DEFAULT_IGNORE_PATTERNS: [&str; 6] = [
    "node_modules",
    "target",
    "dist",
    "build",
    "__pycache__",
    "*.min.js",
];

/// 源码文件及其内容
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// 相对仓库根目录的路径（正斜杠分隔）
    pub rel_path: String,
    /// 文件内容（超限时已截断）
    pub code: String,
}

/// 仓库扫描器
pub struct RepoScanner {
    /// 编译后的忽略模式（glob patterns）
    ignore_patterns: Vec<glob::Pattern>,
}

impl RepoScanner {
    /// 创建使用默认忽略模式的扫描器
    pub fn new() -> Self {
        let ignore_patterns = DEFAULT_IGNORE_PATTERNS
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid ignore pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        Self { ignore_patterns }
    }

    /// 收集仓库中的全部源码文件，按相对路径排序
    pub fn collect_sources(&self, root: &Path) -> Vec<SourceFile> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| self.should_descend(e));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("扫描条目失败: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_code_file(entry.path()) {
                continue;
            }

            match read_source(entry.path()) {
                Ok(Some(code)) => {
                    let rel_path = entry
                        .path()
                        .strip_prefix(root)
                        .map(|p| p.to_string_lossy().replace('\\', "/"))
                        .unwrap_or_else(|_| entry.path().to_string_lossy().to_string());
                    files.push(SourceFile { rel_path, code });
                }
                Ok(None) => {
                    debug!("跳过二进制/非 UTF-8 文件: {}", entry.path().display());
                }
                Err(e) => {
                    warn!("读取文件失败 {}: {}", entry.path().display(), e);
                }
            }
        }

        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        files
    }

    /// 是否进入该目录项（根节点本身始终进入）
    fn should_descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();

        // 忽略隐藏文件/目录（.git 等，以 . 开头）
        if name.starts_with('.') {
            return false;
        }

        !self.ignore_patterns.iter().any(|p| p.matches(&name))
    }
}

impl Default for RepoScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// 检查是否是纳入范围的代码文件
fn is_code_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CODE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 文本文件允许出现的字节
fn is_text_byte(b: u8) -> bool {
    matches!(b, 7 | 8 | 9 | 10 | 12 | 13 | 27) || ((0x20..=0xff).contains(&b) && b != 0x7f)
}

/// 读取源文件内容
///
/// 前 1024 字节含非文本字节或整体不是 UTF-8 时返回 None；
/// 超过大小上限时在字符边界截断并追加标记。
fn read_source(path: &Path) -> std::io::Result<Option<String>> {
    let bytes = fs::read(path)?;

    let head = &bytes[..bytes.len().min(1024)];
    if head.iter().any(|&b| !is_text_byte(b)) {
        return Ok(None);
    }

    let Ok(mut code) = String::from_utf8(bytes) else {
        return Ok(None);
    };

    if code.len() > MAX_FILE_BYTES {
        let mut end = MAX_FILE_BYTES;
        while !code.is_char_boundary(end) {
            end -= 1;
        }
        code.truncate(end);
        code.push_str(TRUNCATION_MARKER);
    }

    Ok(Some(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_repo() -> TempDir {
        let dir = TempDir::new().unwrap();

        let src_dir = dir.path().join("src");
        fs::create_dir(&src_dir).unwrap();

        let mut main_file = File::create(src_dir.join("main.py")).unwrap();
        main_file.write_all(b"print('hello')").unwrap();

        let utils_dir = src_dir.join("utils");
        fs::create_dir(&utils_dir).unwrap();

        let mut helper_file = File::create(utils_dir.join("helper.ts")).unwrap();
        helper_file.write_all(b"export const helper = 1;").unwrap();

        // 应被跳过的内容
        fs::write(dir.path().join("README.md"), "# readme").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("config.py"), "x = 1").unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules").join("lib.js"), "var a;").unwrap();
        fs::write(dir.path().join("blob.c"), b"\x00\x01binary stuff").unwrap();

        dir
    }

    #[test]
    fn test_collect_sources_filters_and_sorts() {
        let repo = create_test_repo();
        let files = RepoScanner::new().collect_sources(repo.path());

        let paths: Vec<_> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["src/main.py", "src/utils/helper.ts"]);
        assert_eq!(files[0].code, "print('hello')");
    }

    #[test]
    fn test_truncates_oversized_file() {
        let dir = TempDir::new().unwrap();
        let big = "a".repeat(MAX_FILE_BYTES + 500);
        fs::write(dir.path().join("big.py"), &big).unwrap();

        let files = RepoScanner::new().collect_sources(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].code.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            files[0].code.len(),
            MAX_FILE_BYTES + TRUNCATION_MARKER.len()
        );
    }

    #[test]
    fn test_is_code_file() {
        assert!(is_code_file(Path::new("main.py")));
        assert!(is_code_file(Path::new("app.ts")));
        assert!(is_code_file(Path::new("lib.CPP")));
        assert!(!is_code_file(Path::new("data.json")));
        assert!(!is_code_file(Path::new("Makefile")));
    }

    #[test]
    fn test_binary_detection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.c");
        fs::write(&path, b"int main\x00() {}").unwrap();
        assert_eq!(read_source(&path).unwrap(), None);

        let text_path = dir.path().join("ok.c");
        fs::write(&text_path, b"int main() { return 0; }\n").unwrap();
        assert!(read_source(&text_path).unwrap().is_some());
    }

    #[test]
    fn test_non_utf8_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.py");
        // 0xE9 单独出现：合法文本字节但不是合法 UTF-8
        fs::write(&path, b"caf\xe9 = 1").unwrap();
        assert_eq!(read_source(&path).unwrap(), None);
    }
}
