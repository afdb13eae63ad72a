//! Resolution of compiled contracts from a Hardhat artifacts directory

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes},
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    backend::ContractResolver,
    constants::{
        ARTIFACT_EXTENSION, BUILD_INFO_DIR, DEBUG_ARTIFACT_SUFFIX, DEFAULT_PROXY_CONTRACT,
        PROXY_ABI, PROXY_BYTECODE, UPGRADE_TO_AND_CALL_FN_NAME, UPGRADE_TO_FN_NAME,
    },
    errors::ScriptError,
    types::ContractHandle,
};

/// A deployable contract: its ABI and creation bytecode, keyed by name
#[derive(Debug, Clone, PartialEq)]
pub struct ContractFactory {
    /// The contract name the factory was resolved from
    pub name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl ContractFactory {
    /// Create a factory from its parts
    pub fn new(name: impl Into<String>, abi: JsonAbi, bytecode: Bytes) -> Self {
        Self {
            name: name.into(),
            abi,
            bytecode,
        }
    }

    /// The `ERC1967Proxy` contract shipped with the scripts
    pub fn embedded_proxy() -> Result<Self, ScriptError> {
        let abi: JsonAbi = serde_json::from_str(PROXY_ABI)
            .map_err(|e| ScriptError::ArtifactParsing(format!("embedded proxy ABI: {e}")))?;
        let bytecode = Bytes::from_str(PROXY_BYTECODE.trim()).map_err(|e| {
            ScriptError::ArtifactParsing(format!("embedded proxy bytecode: {e}"))
        })?;

        Ok(Self::new(DEFAULT_PROXY_CONTRACT, abi, bytecode))
    }

    /// Bind this contract's interface to an existing address
    pub fn attach(&self, address: Address) -> ContractHandle {
        ContractHandle {
            name: self.name.clone(),
            address,
            abi: self.abi.clone(),
        }
    }

    /// Whether the contract carries the UUPS upgrade entrypoints, and so can sit
    /// behind a UUPS proxy without bricking it
    pub fn is_uups(&self) -> bool {
        self.abi.function(UPGRADE_TO_FN_NAME).is_some()
            || self.abi.function(UPGRADE_TO_AND_CALL_FN_NAME).is_some()
    }

    /// The creation code with the ABI-encoded constructor arguments appended
    pub fn deploy_code(&self, args: &[DynSolValue]) -> Result<Bytes, ScriptError> {
        match (self.abi.constructor(), args.is_empty()) {
            (None, true) => Ok(self.bytecode.clone()),
            (None, false) => Err(ScriptError::CalldataConstruction(format!(
                "{} has no constructor but {} arguments were given",
                self.name,
                args.len()
            ))),
            (Some(constructor), _) => {
                let input = constructor
                    .abi_encode_input(args)
                    .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
                Ok(self.bytecode.iter().copied().chain(input).collect())
            }
        }
    }

    /// Encode a call to `function` with arguments given in their string form.
    ///
    /// Each argument is coerced to the type of the matching ABI parameter. `function`
    /// is a bare name or a full signature such as `initialize(address)`. Overloads of
    /// a bare name are told apart by arity, and several overloads of the same arity
    /// are an error. A missing function with no arguments encodes to empty calldata,
    /// i.e. the proxy is not initialized.
    pub fn encode_call(&self, function: &str, args: &[String]) -> Result<Bytes, ScriptError> {
        let name = function.split_once('(').map_or(function, |(name, _)| name);
        let Some(overloads) = self.abi.function(name) else {
            if args.is_empty() {
                return Ok(Bytes::new());
            }
            return Err(ScriptError::CalldataConstruction(format!(
                "{} has no function `{}`",
                self.name, function
            )));
        };

        let function = if name == function {
            select_overload(name, overloads, args.len())?
        } else {
            overloads
                .iter()
                .find(|f| f.signature() == function)
                .ok_or_else(|| {
                    ScriptError::CalldataConstruction(format!(
                        "{} has no function `{}`",
                        self.name, function
                    ))
                })?
        };
        if function.inputs.len() != args.len() {
            return Err(ScriptError::CalldataConstruction(format!(
                "`{}` takes {} arguments, {} were given",
                function.signature(),
                function.inputs.len(),
                args.len()
            )));
        }

        let values = function
            .inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let ty = param
                    .resolve()
                    .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
                ty.coerce_str(arg).map_err(|e| {
                    ScriptError::CalldataConstruction(format!(
                        "invalid value `{}` for parameter `{}` ({}): {}",
                        arg, param.name, param.ty, e
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        function
            .abi_encode_input(&values)
            .map(Bytes::from)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
    }
}

/// Pick the single overload taking exactly `arity` inputs
fn select_overload<'a>(
    name: &str,
    overloads: &'a [Function],
    arity: usize,
) -> Result<&'a Function, ScriptError> {
    let candidates = overloads
        .iter()
        .filter(|f| f.inputs.len() == arity)
        .collect::<Vec<_>>();

    match candidates.as_slice() {
        [function] => Ok(*function),
        [] => {
            let arities = overloads
                .iter()
                .map(|f| f.inputs.len().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(ScriptError::CalldataConstruction(format!(
                "`{}` takes {} arguments, {} were given",
                name, arities, arity
            )))
        }
        _ => {
            let signatures = candidates
                .iter()
                .map(|f| f.signature())
                .collect::<Vec<_>>()
                .join(", ");
            Err(ScriptError::CalldataConstruction(format!(
                "{} arguments match several overloads: {}, name one by its full signature",
                arity, signatures
            )))
        }
    }
}

/// The fields of a Hardhat artifact file that the scripts consume
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    /// The contract name
    contract_name: String,
    /// The source file the contract was compiled from
    source_name: String,
    /// The contract ABI
    abi: JsonAbi,
    /// The hex-encoded creation bytecode
    bytecode: String,
}

/// Contract factories backed by a Hardhat `artifacts/` directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The root of the artifacts directory
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the artifact file for a bare (`Box`) or fully qualified
    /// (`contracts/Box.sol:Box`) contract name
    fn find_artifact(&self, name: &str) -> Result<PathBuf, ScriptError> {
        if !self.root.is_dir() {
            return Err(ScriptError::Configuration(format!(
                "artifacts directory {} does not exist, compile the contracts first",
                self.root.display()
            )));
        }

        if let Some((source, contract)) = name.rsplit_once(':') {
            let path = self
                .root
                .join(source)
                .join(format!("{contract}.{ARTIFACT_EXTENSION}"));
            return if path.is_file() {
                Ok(path)
            } else {
                Err(ScriptError::UnknownContract(name.to_string()))
            };
        }

        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
        let mut matches = artifact_files(&self.root)?
            .into_iter()
            .filter(|path| path.file_name().is_some_and(|f| f == file_name.as_str()))
            .collect::<Vec<_>>();

        match matches.len() {
            0 => Err(ScriptError::UnknownContract(name.to_string())),
            1 => Ok(matches.remove(0)),
            _ => {
                let candidates = matches
                    .iter()
                    .map(|path| self.qualified_name(path, name))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ScriptError::AmbiguousContract(format!(
                    "{name} matches {candidates}, use a fully qualified name"
                )))
            }
        }
    }

    /// The fully qualified name of the artifact at `path`
    fn qualified_name(&self, path: &Path, name: &str) -> String {
        let source = path
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();
        format!("{source}:{name}")
    }
}

impl ContractResolver for ArtifactStore {
    fn contract_factory(&self, name: &str) -> Result<ContractFactory, ScriptError> {
        let path = self.find_artifact(name)?;
        debug!("Loading artifact {}", path.display());

        let contents =
            fs::read_to_string(&path).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        let artifact: HardhatArtifact = serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

        if artifact.bytecode.trim_start_matches("0x").is_empty() {
            return Err(ScriptError::AbstractContract(format!(
                "{}:{}",
                artifact.source_name, artifact.contract_name
            )));
        }

        let bytecode = Bytes::from_str(&artifact.bytecode).map_err(|e| {
            ScriptError::ArtifactParsing(format!(
                "bytecode of {} is not valid hex, it may need library linking: {}",
                artifact.contract_name, e
            ))
        })?;

        Ok(ContractFactory::new(
            artifact.contract_name,
            artifact.abi,
            bytecode,
        ))
    }
}

/// Every contract artifact below `root`, skipping build info and debug files
fn artifact_files(root: &Path) -> Result<Vec<PathBuf>, ScriptError> {
    let mut files = Vec::new();
    let mut dirs = vec![root.to_path_buf()];

    while let Some(dir) = dirs.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        for entry in entries {
            let path = entry
                .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
                .path();

            if path.is_dir() {
                if path.file_name().is_some_and(|f| f != BUILD_INFO_DIR) {
                    dirs.push(path);
                }
                continue;
            }

            let is_artifact = path
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| {
                    f.ends_with(&format!(".{ARTIFACT_EXTENSION}"))
                        && !f.ends_with(DEBUG_ARTIFACT_SUFFIX)
                });
            if is_artifact {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
