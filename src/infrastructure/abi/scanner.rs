//! ABI artifact lookup - finds compiled contract ABIs on the filesystem

use std::fs;
use std::path::{Path, PathBuf};

use alloy_json_abi::JsonAbi;
use anyhow::{anyhow, Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use super::signature::FunctionShape;

/// Locates `<Contract>.json` artifacts under build output directories
pub struct AbiScanner;

impl AbiScanner {
    /// Find the artifact for `contract` under any of `roots`
    ///
    /// Only JSON files inside `out/` or `artifacts/` directories count, the
    /// places Foundry and Hardhat write them. The first match wins.
    pub fn find_artifact(roots: &[PathBuf], contract: &str) -> Option<PathBuf> {
        let file_name = format!("{}.json", contract);
        roots.iter().find_map(|root| {
            WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| !Self::is_ignored_dir(e.path()))
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .find(|path| {
                    path.file_name().and_then(|n| n.to_str()) == Some(file_name.as_str())
                        && Self::path_contains_any(path, &["out", "artifacts"])
                })
        })
    }

    /// Resolve `Contract.function` to a function shape
    ///
    /// Overloaded functions resolve to the first declaration.
    pub fn resolve_function(roots: &[PathBuf], target: &str) -> Result<FunctionShape> {
        let (contract, function) = target
            .split_once('.')
            .ok_or_else(|| anyhow!("expected <Contract>.<function>, got '{}'", target))?;
        let path = Self::find_artifact(roots, contract)
            .ok_or_else(|| anyhow!("no artifact found for contract '{}'", contract))?;
        debug!(path = %path.display(), function, "loading ABI artifact");

        let abi = Self::load_abi_file(&path)?;
        let entry = abi
            .function(function)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| anyhow!("function '{}' not found in {}", function, path.display()))?;
        FunctionShape::from_function(entry)
    }

    /// Load an ABI file, either a bare ABI array or an artifact with an `abi` key
    pub fn load_abi_file(path: &Path) -> Result<JsonAbi> {
        let content =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("parse {}", path.display()))?;

        let abi_value = if value.is_array() {
            value
        } else if let Some(abi) = value.get("abi") {
            abi.clone()
        } else {
            return Err(anyhow!("{} contains no ABI", path.display()));
        };

        serde_json::from_value(abi_value).with_context(|| format!("decode ABI in {}", path.display()))
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                matches!(
                    name,
                    ".git" | "target" | "node_modules" | ".next" | "dist" | "build"
                )
            })
            .unwrap_or(false)
    }

    /// Check if path contains any of the given names
    fn path_contains_any(path: &Path, names: &[&str]) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(value) = component {
                if let Some(value) = value.to_str() {
                    return names.iter().any(|name| *name == value);
                }
            }
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Schema;

    const ERC20_ABI: &str = r#"[
        {"type":"function","name":"transfer","stateMutability":"nonpayable",
         "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
         "outputs":[{"name":"","type":"bool"}]},
        {"type":"function","name":"name","stateMutability":"view",
         "inputs":[],"outputs":[{"name":"","type":"string"}]}
    ]"#;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("abicodec-scanner-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_is_ignored_dir() {
        assert!(AbiScanner::is_ignored_dir(Path::new(".git")));
        assert!(AbiScanner::is_ignored_dir(Path::new("node_modules")));
        assert!(!AbiScanner::is_ignored_dir(Path::new("src")));
        assert!(!AbiScanner::is_ignored_dir(Path::new("out")));
    }

    #[test]
    fn test_path_contains_any() {
        assert!(AbiScanner::path_contains_any(
            Path::new("/project/out/Contract.json"),
            &["out", "artifacts"]
        ));
        assert!(!AbiScanner::path_contains_any(
            Path::new("/project/src/Contract.sol"),
            &["out", "artifacts"]
        ));
    }

    #[test]
    fn test_resolve_function_from_artifact() {
        let root = scratch_dir("resolve");
        let out = root.join("out").join("Token.sol");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("Token.json"), format!(r#"{{"abi":{}}}"#, ERC20_ABI)).unwrap();

        let roots = vec![root.clone()];
        let shape = AbiScanner::resolve_function(&roots, "Token.name").unwrap();
        assert_eq!(shape.signature, "name()");
        assert_eq!(shape.outputs, Schema::tuple([Schema::Dynamic]));

        let shape = AbiScanner::resolve_function(&roots, "Token.transfer").unwrap();
        assert_eq!(shape.selector_hex(), "0xa9059cbb");

        assert!(AbiScanner::resolve_function(&roots, "Token.missing").is_err());
        assert!(AbiScanner::resolve_function(&roots, "Missing.name").is_err());
        assert!(AbiScanner::resolve_function(&roots, "no-dot").is_err());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_load_bare_abi_array() {
        let root = scratch_dir("bare");
        fs::create_dir_all(&root).unwrap();
        let path = root.join("erc20.json");
        fs::write(&path, ERC20_ABI).unwrap();

        let abi = AbiScanner::load_abi_file(&path).unwrap();
        assert_eq!(abi.functions().count(), 2);

        let _ = fs::remove_dir_all(&root);
    }
}
