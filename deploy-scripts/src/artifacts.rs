//! Resolution of compiled contract artifacts by contract name

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
    json_abi::JsonAbi,
    primitives::Bytes,
};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    constants::{
        ARTIFACT_EXTENSION, BUILD_INFO_DIR, LIBRARY_PLACEHOLDER_MARKER, SOLIDITY_EXTENSION,
    },
    errors::ScriptError,
};

/// The on-disk JSON form of an artifact
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: String,
    #[serde(default)]
    source_name: String,
    abi: JsonAbi,
    bytecode: String,
    #[serde(default)]
    link_references: Map<String, Value>,
}

/// A compiled contract, ready to be deployed
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The name of the contract
    pub contract_name: String,
    /// The path of the source file the contract was compiled from
    pub source_name: String,
    /// The contract's ABI
    pub abi: JsonAbi,
    /// The contract's creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl Artifact {
    /// Parse an artifact from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact =
            serde_json::from_str(json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        if !raw.link_references.is_empty() || raw.bytecode.contains(LIBRARY_PLACEHOLDER_MARKER) {
            let libraries = raw
                .link_references
                .values()
                .filter_map(Value::as_object)
                .flat_map(Map::keys)
                .join(", ");
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` needs unlinked libraries: {}",
                raw.contract_name, libraries
            )));
        }

        let bytecode = Bytes::from_str(&raw.bytecode)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` has no bytecode, it may be abstract or an interface",
                raw.contract_name
            )));
        }

        Ok(Self {
            contract_name: raw.contract_name,
            source_name: raw.source_name,
            abi: raw.abi,
            bytecode,
        })
    }

    /// Whether the contract has a function `name` taking no arguments
    pub fn has_nullary_function(&self, name: &str) -> bool {
        self.abi
            .function(name)
            .is_some_and(|overloads| overloads.iter().any(|f| f.inputs.is_empty()))
    }

    /// Build the creation code for a deployment, coercing each string argument
    /// to the type its constructor parameter declares. Arguments to `string`
    /// parameters are encoded verbatim
    pub fn creation_code(&self, args: &[String]) -> Result<Bytes, ScriptError> {
        let param_types = match &self.abi.constructor {
            Some(constructor) => constructor
                .inputs
                .iter()
                .map(|param| {
                    param.resolve().map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![],
        };

        if param_types.len() != args.len() {
            return Err(ScriptError::CalldataConstruction(format!(
                "`{}` constructor takes {} arguments, got {}",
                self.contract_name,
                param_types.len(),
                args.len()
            )));
        }

        let values = param_types
            .iter()
            .zip(args)
            .map(|(ty, arg)| match ty {
                // Strings are passed through as typed, quotes and whitespace included
                DynSolType::String => Ok(DynSolValue::String(arg.clone())),
                _ => ty.coerce_str(arg).map_err(|e| {
                    ScriptError::CalldataConstruction(format!("argument `{arg}`: {e}"))
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.creation_code_with(&values)
    }

    /// Build the creation code for a deployment from typed constructor arguments
    pub fn creation_code_with(&self, values: &[DynSolValue]) -> Result<Bytes, ScriptError> {
        let encoded_args = match &self.abi.constructor {
            Some(constructor) => constructor
                .abi_encode_input(values)
                .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?,
            None if values.is_empty() => vec![],
            None => {
                return Err(ScriptError::CalldataConstruction(format!(
                    "`{}` has no constructor but {} arguments were given",
                    self.contract_name,
                    values.len()
                )))
            }
        };

        let mut code = self.bytecode.to_vec();
        code.extend(encoded_args);
        Ok(code.into())
    }
}

/// Finds artifacts in the compiler's output directory
///
/// Artifacts are laid out as `<root>/<source path>/<File>.sol/<Name>.json`
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The root of the artifacts tree
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store over the given artifacts directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a contract by its bare name, or by a fully qualified
    /// `path/File.sol:Name` when the bare name is ambiguous
    pub fn resolve(&self, name: &str) -> Result<Artifact, ScriptError> {
        if !self.root.is_dir() {
            return Err(ScriptError::ArtifactResolution(format!(
                "artifacts directory {} not found, compile the contracts first",
                self.root.display()
            )));
        }

        let path = match name.split_once(':') {
            Some((source, contract)) => {
                let path = self.root.join(source).join(artifact_file_name(contract));
                if !path.is_file() {
                    return Err(ScriptError::ArtifactResolution(format!(
                        "no artifact for `{name}` at {}",
                        path.display()
                    )));
                }
                path
            }
            None => self.find_unique(name)?,
        };

        debug!("resolved `{}` to {}", name, path.display());
        let json =
            fs::read_to_string(&path).map_err(|e| ScriptError::ArtifactResolution(e.to_string()))?;
        Artifact::from_json(&json)
    }

    /// Search the tree for the single artifact named `contract`
    fn find_unique(&self, contract: &str) -> Result<PathBuf, ScriptError> {
        let file_name = artifact_file_name(contract);
        let mut candidates = Vec::new();
        collect_candidates(&self.root, &file_name, &mut candidates)?;

        match candidates.len() {
            0 => Err(ScriptError::ArtifactResolution(format!(
                "no artifact found for contract `{contract}`"
            ))),
            1 => Ok(candidates.remove(0)),
            _ => Err(ScriptError::ArtifactResolution(format!(
                "multiple artifacts named `{contract}`, use a fully qualified name: {}",
                candidates
                    .iter()
                    .filter_map(|path| self.qualified_name(path, contract))
                    .sorted()
                    .join(", ")
            ))),
        }
    }

    /// The `path/File.sol:Name` form of the artifact at `path`
    fn qualified_name(&self, path: &Path, contract: &str) -> Option<String> {
        let source = path.parent()?.strip_prefix(&self.root).ok()?;
        Some(format!("{}:{contract}", source.display()))
    }
}

/// The file name of the artifact for `contract`
fn artifact_file_name(contract: &str) -> String {
    format!("{contract}.{ARTIFACT_EXTENSION}")
}

/// Recursively collect files named `file_name` that sit in a `.sol` directory
fn collect_candidates(
    dir: &Path,
    file_name: &str,
    candidates: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries =
        fs::read_dir(dir).map_err(|e| ScriptError::ArtifactResolution(e.to_string()))?;

    for entry in entries {
        let path = entry.map_err(|e| ScriptError::ArtifactResolution(e.to_string()))?.path();

        if path.is_dir() {
            if path.file_name().is_some_and(|name| name == BUILD_INFO_DIR) {
                continue;
            }
            collect_candidates(&path, file_name, candidates)?;
        } else if path.file_name().is_some_and(|name| name == file_name)
            && path
                .parent()
                .and_then(Path::extension)
                .is_some_and(|ext| ext == SOLIDITY_EXTENSION)
        {
            candidates.push(path);
        }
    }

    Ok(())
}
