//! Local model stores
//!
//! Two read-only views of the client's local state:
//! - [`ClientStore`]: `models.yaml`, keyed by controller, account and model name
//! - [`EndpointStore`]: `environments/<model>.jenv`, keyed by model name; without one it
//!   takes the current model from `models.yaml`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::domain::ModelSelector;
use crate::infrastructure::traits::{FileSystem, ModelResolver};
use crate::infrastructure::{InfraError, InfraResult};

/// File name of the client store inside the data directory.
pub const MODELS_FILE: &str = "models.yaml";

/// Directory holding per-model endpoint info files.
pub const ENVIRONMENTS_DIR: &str = "environments";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ModelsFile {
    current_controller: Option<String>,
    #[serde(default)]
    controllers: BTreeMap<String, ControllerModels>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ControllerModels {
    current_account: Option<String>,
    #[serde(default)]
    accounts: BTreeMap<String, AccountModels>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AccountModels {
    current_model: Option<String>,
    #[serde(default)]
    models: BTreeMap<String, ModelDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ModelDetails {
    #[serde(alias = "uuid")]
    model_uuid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct EndpointInfo {
    endpoint: Endpoint,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Endpoint {
    model_uuid: String,
}

fn read_yaml<T: DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> InfraResult<T> {
    if !fs.exists(path) {
        return Err(InfraError::NotFound(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let content = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    serde_yaml::from_str(&content).map_err(|source| InfraError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Session store keyed by controller, account and model name.
pub struct ClientStore {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
}

impl ClientStore {
    pub fn new(fs: Arc<dyn FileSystem>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            data_dir: data_dir.into(),
        }
    }

    fn models_path(&self) -> PathBuf {
        self.data_dir.join(MODELS_FILE)
    }
}

impl ModelResolver for ClientStore {
    fn model_uuid(&self, selector: &ModelSelector) -> InfraResult<String> {
        let path = self.models_path();
        debug!("model_uuid: selector={}, store={}", selector, path.display());
        let file: ModelsFile = read_yaml(self.fs.as_ref(), &path)?;

        let (controller_name, account_name, account) = file.account(selector)?;
        let model_name = selector
            .model
            .as_deref()
            .or(account.current_model.as_deref())
            .ok_or_else(|| InfraError::NotFound("no model selected".into()))?;
        let model = account.models.get(model_name).ok_or_else(|| {
            InfraError::NotFound(format!(
                "model {}:{}/{} not found",
                controller_name, account_name, model_name
            ))
        })?;

        debug!("model_uuid: resolved {} to {}", model_name, model.model_uuid);
        Ok(model.model_uuid.clone())
    }
}

impl ModelsFile {
    /// Account named by `selector`, falling back to the current controller and account.
    fn account<'a>(
        &'a self,
        selector: &'a ModelSelector,
    ) -> InfraResult<(&'a str, &'a str, &'a AccountModels)> {
        let controller_name = selector
            .controller
            .as_deref()
            .or(self.current_controller.as_deref())
            .ok_or_else(|| InfraError::NotFound("no controller selected".into()))?;
        let controller = self.controllers.get(controller_name).ok_or_else(|| {
            InfraError::NotFound(format!("controller {:?} not found", controller_name))
        })?;

        let account_name = selector
            .account
            .as_deref()
            .or(controller.current_account.as_deref())
            .ok_or_else(|| {
                InfraError::NotFound(format!(
                    "no account selected on controller {:?}",
                    controller_name
                ))
            })?;
        let account = controller.accounts.get(account_name).ok_or_else(|| {
            InfraError::NotFound(format!(
                "account {:?} not found on controller {:?}",
                account_name, controller_name
            ))
        })?;
        Ok((controller_name, account_name, account))
    }
}

/// Persisted endpoint info, one file per model.
pub struct EndpointStore {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
}

impl EndpointStore {
    pub fn new(fs: Arc<dyn FileSystem>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            data_dir: data_dir.into(),
        }
    }

    /// Name of the current model in `models.yaml`, used when no model is given.
    fn current_model(&self, selector: &ModelSelector) -> InfraResult<String> {
        let path = self.data_dir.join(MODELS_FILE);
        if !self.fs.exists(&path) {
            return Err(InfraError::NotFound(
                "no model specified, use -m [<controller>:]<model>".into(),
            ));
        }
        let file: ModelsFile = read_yaml(self.fs.as_ref(), &path)?;
        let (_, _, account) = file.account(selector)?;
        account
            .current_model
            .clone()
            .ok_or_else(|| InfraError::NotFound("no model selected".into()))
    }

    /// Path of the endpoint info file for `model`.
    pub fn info_path(&self, model: &str) -> PathBuf {
        self.data_dir
            .join(ENVIRONMENTS_DIR)
            .join(format!("{model}.jenv"))
    }
}

impl ModelResolver for EndpointStore {
    fn model_uuid(&self, selector: &ModelSelector) -> InfraResult<String> {
        let model = match &selector.model {
            Some(model) => model.clone(),
            None => self.current_model(selector)?,
        };
        if model.contains(['/', '\\']) || model == "." || model == ".." {
            return Err(InfraError::NotFound(format!("invalid model name {:?}", model)));
        }
        let path = self.info_path(&model);
        debug!("model_uuid: model={}, store={}", model, path.display());
        let info: EndpointInfo = read_yaml(self.fs.as_ref(), &path)?;
        Ok(info.endpoint.model_uuid)
    }
}
