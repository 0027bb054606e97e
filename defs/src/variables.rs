use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Variables supplied by the host for a single build target.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct BuildVariables(BTreeMap<String, String>);

impl BuildVariables {
    pub fn new() -> Self {
        BuildVariables(BTreeMap::new())
    }

    pub fn insert(&mut self, name: &str, value: &str) -> Option<String> {
        self.0.insert(name.to_string(), value.to_string())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        BuildVariables(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct WellKnownVariable {
    pub name: &'static str,
    pub description: &'static str,
}

/// Variables a build host typically provides for every build target.
pub fn well_known_variables() -> Vec<WellKnownVariable> {
    [
        ("buildable.diff", "The diff ID, if applicable."),
        ("buildable.revision", "The revision ID, if applicable."),
        ("buildable.commit", "The commit identifier, if applicable."),
        ("repository.callsign", "The callsign of the repository."),
        ("repository.phid", "The PHID of the repository."),
        ("repository.vcs", "The version control system, either \"svn\", \"hg\" or \"git\"."),
        ("repository.uri", "The URI to clone or checkout the repository from."),
        ("step.timestamp", "The current UNIX timestamp."),
        ("build.id", "The ID of the current build."),
        ("target.phid", "The PHID of the current build target."),
        ("initiator.phid", "The PHID of the user or object that initiated the build."),
    ]
    .into_iter()
    .map(|(name, description)| WellKnownVariable { name, description })
    .collect()
}
