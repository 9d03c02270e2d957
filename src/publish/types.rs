//! Value types crossing the publishing boundary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::templates::{PartialLoader, Template};

/// The payload shipped to the external template host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
    pub from_name: String,
    pub from_email: String,
}

/// Parameters for one publish call.
///
/// `variable_names` enumerates the variables available to the template
/// at send time; they are preserved symbolically in the published copy.
pub struct PublishRequest<'a> {
    pub template: &'a Template,
    pub template_list: &'a [String],
    pub loader: &'a dyn PartialLoader,
    pub variable_names: &'a [String],
}

impl fmt::Debug for PublishRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRequest")
            .field("template", &self.template.name)
            .field("template_list", &self.template_list)
            .field("variable_names", &self.variable_names)
            .finish_non_exhaustive()
    }
}
