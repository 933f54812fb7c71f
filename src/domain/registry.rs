//! Capability registry
//!
//! Immutable lookup tables for tool, resource and prompt descriptors. Built
//! once at startup and shared behind an `Arc` for the lifetime of the server.

use std::collections::HashMap;

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    prompts::standard_prompts, resources::standard_resources, tools::standard_tools,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate {kind} '{key}'")]
    Duplicate { kind: &'static str, key: String },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Integer,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PropertySchema {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertySchema {
    pub fn string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyType::String,
            description: description.to_string(),
            default: None,
        }
    }

    pub fn integer(name: &str, description: &str) -> Self {
        Self {
            kind: PropertyType::Integer,
            ..Self::string(name, description)
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Schema properties keyed by name, serialized as a JSON object in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<PropertySchema>);

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for property in &self.0 {
            map.serialize_entry(&property.name, property)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: Properties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: InputSchema {
                kind: "object",
                properties: Properties::default(),
                required: Vec::new(),
            },
        }
    }

    pub fn property(mut self, property: PropertySchema) -> Self {
        self.input_schema.properties.0.push(property);
        self
    }

    pub fn required(mut self, names: &[&str]) -> Self {
        self.input_schema
            .required
            .extend(names.iter().map(|name| name.to_string()));
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PromptArgumentSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PromptDescriptor {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgumentSpec>,
}

impl PromptDescriptor {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn argument(mut self, name: &str, description: &str, required: bool) -> Self {
        self.arguments.push(PromptArgumentSpec {
            name: name.to_string(),
            description: description.to_string(),
            required,
        });
        self
    }
}

#[derive(Debug)]
pub struct Registry {
    tools: Vec<ToolDescriptor>,
    resources: Vec<ResourceDescriptor>,
    prompts: Vec<PromptDescriptor>,
    tool_index: HashMap<String, usize>,
    resource_index: HashMap<String, usize>,
    prompt_index: HashMap<String, usize>,
}

impl Registry {
    /// The fixed capability table served by this process.
    pub fn standard() -> Result<Self, RegistryError> {
        Self::from_parts(standard_tools(), standard_resources(), standard_prompts())
    }

    pub(crate) fn from_parts(
        tools: Vec<ToolDescriptor>,
        resources: Vec<ResourceDescriptor>,
        prompts: Vec<PromptDescriptor>,
    ) -> Result<Self, RegistryError> {
        let tool_index = index_by(&tools, "tool", |tool| &tool.name)?;
        let resource_index = index_by(&resources, "resource", |resource| &resource.uri)?;
        let prompt_index = index_by(&prompts, "prompt", |prompt| &prompt.name)?;

        Ok(Self {
            tools,
            resources,
            prompts,
            tool_index,
            resource_index,
            prompt_index,
        })
    }

    pub fn tool_by_name(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tool_index.get(name).map(|&index| &self.tools[index])
    }

    pub fn resource_by_uri(&self, uri: &str) -> Option<&ResourceDescriptor> {
        self.resource_index
            .get(uri)
            .map(|&index| &self.resources[index])
    }

    pub fn prompt_by_name(&self, name: &str) -> Option<&PromptDescriptor> {
        self.prompt_index
            .get(name)
            .map(|&index| &self.prompts[index])
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn prompts(&self) -> &[PromptDescriptor] {
        &self.prompts
    }
}

fn index_by<T>(
    items: &[T],
    kind: &'static str,
    key: impl Fn(&T) -> &String,
) -> Result<HashMap<String, usize>, RegistryError> {
    let mut index = HashMap::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let key = key(item);
        if index.insert(key.clone(), position).is_some() {
            return Err(RegistryError::Duplicate {
                kind,
                key: key.clone(),
            });
        }
    }
    Ok(index)
}
