//! Request builder: identity parameters, options and per-call parameters

use log::debug;

use super::call::{CallDescriptor, Param};
use super::{
    DEFAULT_FORMAT_GUID, DEFAULT_LANGUAGE, GOVERNMENT_PARAM, OPTIONS_PARAM, PARTNER_PARAM,
};
use crate::error::{Error, Result};

/// A caller-supplied parameter value
///
/// A `Map` becomes a nested structure whose schema type is named after the
/// parameter it is passed as, so search criteria can be given as plain
/// key/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Map(Vec<(String, ParamValue)>),
}

impl ParamValue {
    /// Build a map value from `(key, value)` pairs
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        ParamValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    fn into_param(self, name: &str) -> Param {
        match self {
            ParamValue::Text(s) => Param::Text(s),
            ParamValue::Map(entries) => Param::Struct {
                type_name: name.to_string(),
                fields: entries
                    .into_iter()
                    .map(|(key, value)| {
                        let param = value.into_param(&key);
                        (key, param)
                    })
                    .collect(),
            },
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Text(if value { "true" } else { "false" }.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Entry point for assembling calls under one identity
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    credential: &'a str,
    tenant: Option<&'a str>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a builder for the given credential token and current tenant
    pub fn new(credential: &'a str, tenant: Option<&'a str>) -> Self {
        Self { credential, tenant }
    }

    /// Start building a call to `operation`
    pub fn build(&self, operation: impl Into<String>) -> CallBuilder<'a> {
        CallBuilder {
            credential: self.credential,
            tenant: self.tenant,
            operation: operation.into(),
            requires_tenant: false,
            options_schema: None,
            option_overrides: Vec::new(),
            params: Vec::new(),
        }
    }
}

/// Fluent builder for a single [`CallDescriptor`]
#[derive(Debug, Clone)]
pub struct CallBuilder<'a> {
    credential: &'a str,
    tenant: Option<&'a str>,
    operation: String,
    requires_tenant: bool,
    options_schema: Option<String>,
    option_overrides: Vec<(String, Param)>,
    params: Vec<(String, Param)>,
}

impl<'a> CallBuilder<'a> {
    /// Require and inject the selected government
    pub fn tenant_scoped(mut self) -> Self {
        self.requires_tenant = true;
        self
    }

    /// Attach an options structure of the given schema type, with service defaults
    pub fn options(mut self, schema_name: impl Into<String>) -> Self {
        self.options_schema = Some(schema_name.into());
        self
    }

    /// Override one options field
    pub fn option(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let key = key.into();
        let param = value.into().into_param(&key);
        set_field(&mut self.option_overrides, key, param);
        self
    }

    /// Override several options fields
    pub fn option_overrides<K, V, I>(mut self, overrides: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in overrides {
            self = self.option(key, value);
        }
        self
    }

    /// Add a named parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let name = name.into();
        let param = value.into().into_param(&name);
        set_field(&mut self.params, name, param);
        self
    }

    /// Add several named parameters
    pub fn params<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in params {
            self = self.param(name, value);
        }
        self
    }

    /// Assemble the call descriptor
    ///
    /// # Errors
    /// Returns [`Error::NoTenantSelected`] if the call is tenant-scoped and no
    /// government has been selected.
    pub fn finish(self) -> Result<CallDescriptor> {
        let mut params = Vec::with_capacity(self.params.len() + 3);
        params.push((PARTNER_PARAM.to_string(), Param::Text(self.credential.to_string())));

        if self.requires_tenant {
            let tenant = self.tenant.ok_or_else(|| Error::NoTenantSelected {
                operation: self.operation.clone(),
            })?;
            params.push((GOVERNMENT_PARAM.to_string(), Param::Text(tenant.to_string())));
        }

        params.extend(self.params);

        let options = match self.options_schema {
            Some(schema) => {
                let mut fields = vec![
                    ("Language".to_string(), Param::Text(DEFAULT_LANGUAGE.to_string())),
                    ("FormatGUID".to_string(), Param::Text(DEFAULT_FORMAT_GUID.to_string())),
                ];
                for (key, value) in self.option_overrides {
                    set_field(&mut fields, key, value);
                }
                Some(Param::Struct {
                    type_name: schema,
                    fields,
                })
            }
            None if !self.option_overrides.is_empty() => Some(Param::Struct {
                type_name: OPTIONS_PARAM.to_string(),
                fields: self.option_overrides,
            }),
            None => None,
        };
        if let Some(options) = options {
            set_field(&mut params, OPTIONS_PARAM.to_string(), options);
        }

        let call = CallDescriptor::new(self.operation, params);
        debug!("Built call {}", call);
        Ok(call)
    }
}

/// Replace an existing field in place, or append it
fn set_field(fields: &mut Vec<(String, Param)>, key: String, value: Param) {
    match fields.iter_mut().find(|(n, _)| *n == key) {
        Some(slot) => slot.1 = value,
        None => fields.push((key, value)),
    }
}
