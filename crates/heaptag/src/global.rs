use once_cell::sync::OnceCell;

use crate::error::{model_err, Result};
use crate::model::ObjectModel;

static MODEL: OnceCell<ObjectModel> = OnceCell::new();

pub fn install(model: ObjectModel) -> Result<&'static ObjectModel> {
    match MODEL.try_insert(model) {
        Ok(installed) => {
            tracing::debug!("process-wide object model installed");
            Ok(installed)
        }
        Err(_) => Err(model_err!(
            AlreadyInstalled,
            "a process-wide object model is already installed"
        )),
    }
}

pub fn get() -> Option<&'static ObjectModel> {
    MODEL.get()
}
