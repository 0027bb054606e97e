use serde::Serialize;

pub const SETTING_SERVER_URL: &str = "server.url";
pub const SETTING_CREDENTIAL: &str = "credential";
pub const SETTING_PIPELINE: &str = "pipeline";
pub const SETTING_QUERY_STRING: &str = "query.string";

pub const CREDENTIAL_TYPE_PASSWORD: &str = "password";

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Credential,
}

/// One configurable setting, as rendered by the host's settings form.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(rename = "credential.type", skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<&'static str>,
    #[serde(rename = "credential.provides", skip_serializing_if = "Option::is_none")]
    pub credential_provides: Option<&'static str>,
}

impl FieldSpec {
    const fn text(key: &'static str, name: &'static str, required: bool) -> Self {
        FieldSpec {
            key,
            name,
            field_type: FieldType::Text,
            required,
            credential_type: None,
            credential_provides: None,
        }
    }
}

pub fn field_specifications() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text(SETTING_SERVER_URL, "GoCD base URL", true),
        FieldSpec {
            key: SETTING_CREDENTIAL,
            name: "Credentials",
            field_type: FieldType::Credential,
            required: false,
            credential_type: Some(CREDENTIAL_TYPE_PASSWORD),
            credential_provides: Some(CREDENTIAL_TYPE_PASSWORD),
        },
        FieldSpec::text(SETTING_PIPELINE, "Pipeline Name", true),
        FieldSpec::text(SETTING_QUERY_STRING, "POST Query String", false),
    ]
}

/// Display metadata of the build step.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct StepInfo {
    pub name: &'static str,
    pub generic_description: &'static str,
    pub description: &'static str,
    pub edit_instructions: &'static str,
    pub group_key: &'static str,
}

pub const STEP_INFO: StepInfo = StepInfo {
    name: "Build with GoCD",
    generic_description: "Trigger a pipeline in GoCD.",
    description: "Run a build in GoCD.",
    edit_instructions: "GoCD buildstep",
    group_key: "external",
};

/// Scheduling hints for the host: the step finishes only once GoCD reports
/// back with a message.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct StepCapabilities {
    pub supports_wait_for_message: bool,
    pub should_wait_for_message: bool,
}

pub const STEP_CAPABILITIES: StepCapabilities = StepCapabilities {
    supports_wait_for_message: true,
    should_wait_for_message: true,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_specifications_requiredness() {
        let fields = field_specifications();
        let required: Vec<(&str, bool)> = fields.iter().map(|f| (f.key, f.required)).collect();
        assert_eq!(
            required,
            vec![
                ("server.url", true),
                ("credential", false),
                ("pipeline", true),
                ("query.string", false),
            ]
        );
    }

    #[test]
    fn test_field_specifications_serialize() {
        let fields = field_specifications();
        let credential = serde_json::to_value(&fields[1]).unwrap();
        assert_eq!(
            credential,
            serde_json::json!({
                "key": "credential",
                "name": "Credentials",
                "type": "credential",
                "required": false,
                "credential.type": "password",
                "credential.provides": "password",
            })
        );
        let pipeline = serde_json::to_value(&fields[2]).unwrap();
        assert_eq!(pipeline.get("credential.type"), None);
        assert_eq!(pipeline["type"], "text");
    }
}
