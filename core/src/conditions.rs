#![deny(missing_docs)]

//! # Validation Conditions
//!
//! Turns a field's constraint attributes into the ordered list of validation
//! directives the templates render.
//!
//! Emission order is fixed:
//! `min, max, maxLength, minLength, pattern, minimum, maximum, multipleOf,
//! maxItems, minItems, uniqueItems, isEnum, required, isEmail, isUri,
//! isPassword, isUuid, isIpv4, isIpv6, isHostname`.
//!
//! Only present constraints are emitted. Nothing here fails: a constraint that
//! could not be read upstream is simply absent.

use crate::config::GeneratorConfig;
use crate::model::{Field, FieldFormat};
use serde::Serialize;
use serde_json::Value;

/// Name of a validation directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionName {
    /// Generic lower bound.
    Min,
    /// Generic upper bound.
    Max,
    /// Maximum string length.
    MaxLength,
    /// Minimum string length.
    MinLength,
    /// Regular expression.
    Pattern,
    /// Lower numeric bound.
    Minimum,
    /// Upper numeric bound.
    Maximum,
    /// Multiple-of divisor.
    MultipleOf,
    /// Maximum item count.
    MaxItems,
    /// Minimum item count.
    MinItems,
    /// Items must be unique.
    UniqueItems,
    /// Value must be one of the enum members.
    IsEnum,
    /// Value must be present.
    Required,
    /// Email address.
    IsEmail,
    /// URI.
    IsUri,
    /// Password.
    IsPassword,
    /// UUID.
    IsUuid,
    /// IPv4 address.
    IsIpv4,
    /// IPv6 address.
    IsIpv6,
    /// Hostname.
    IsHostname,
}

/// One named constraint instance, e.g. `{minLength: 3}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionRecord {
    /// Directive name.
    pub name: ConditionName,
    /// Directive argument.
    pub value: Value,
    /// Set on `minimum` / `maximum` when the bound itself is excluded.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive: bool,
}

impl ConditionRecord {
    /// A record with an inclusive (or non-range) value.
    pub fn new(name: ConditionName, value: impl Into<Value>) -> Self {
        Self {
            name,
            value: value.into(),
            exclusive: false,
        }
    }

    fn flag(name: ConditionName) -> Self {
        Self::new(name, true)
    }
}

/// Feature flags that gate optional directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionFlags {
    /// Emit `pattern`.
    pub support_pattern: bool,
    /// Emit `multipleOf`.
    pub support_multiple_of: bool,
}

impl From<&GeneratorConfig> for ConditionFlags {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            support_pattern: config.support_pattern,
            support_multiple_of: config.support_multiple_of,
        }
    }
}

/// Derived directives plus the summary flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedConditions {
    /// Directives in emission order.
    pub conditions: Vec<ConditionRecord>,
    /// `!conditions.is_empty()`
    pub has_conditions: bool,
}

/// Derives the ordered directive list for a field.
pub fn derive_conditions(field: &Field, flags: ConditionFlags) -> DerivedConditions {
    use ConditionName::*;

    let c = &field.constraints;
    let mut out = Vec::new();

    if let Some(v) = &c.min {
        out.push(ConditionRecord::new(Min, Value::Number(v.clone())));
    }
    if let Some(v) = &c.max {
        out.push(ConditionRecord::new(Max, Value::Number(v.clone())));
    }
    if let Some(v) = c.max_length {
        out.push(ConditionRecord::new(MaxLength, v));
    }
    if let Some(v) = c.min_length {
        out.push(ConditionRecord::new(MinLength, v));
    }
    if flags.support_pattern {
        if let Some(p) = c.pattern.as_deref().filter(|p| !p.is_empty()) {
            out.push(ConditionRecord::new(Pattern, p));
        }
    }
    if let Some(bound) = &c.minimum {
        out.push(ConditionRecord {
            name: Minimum,
            value: Value::Number(bound.value.clone()),
            exclusive: bound.exclusive,
        });
    }
    if let Some(bound) = &c.maximum {
        out.push(ConditionRecord {
            name: Maximum,
            value: Value::Number(bound.value.clone()),
            exclusive: bound.exclusive,
        });
    }
    if flags.support_multiple_of {
        if let Some(v) = &c.multiple_of {
            out.push(ConditionRecord::new(MultipleOf, Value::Number(v.clone())));
        }
    }
    if let Some(v) = c.max_items {
        out.push(ConditionRecord::new(MaxItems, v));
    }
    if let Some(v) = c.min_items {
        out.push(ConditionRecord::new(MinItems, v));
    }
    if c.unique_items {
        out.push(ConditionRecord::flag(UniqueItems));
    }
    if field.is_enum {
        out.push(ConditionRecord::flag(IsEnum));
    }
    // Output-only fields are never checked as missing input.
    if field.required && !field.read_only {
        out.push(ConditionRecord::flag(Required));
    }

    let format_flag = match field.format {
        FieldFormat::Email => Some(IsEmail),
        FieldFormat::Uri => Some(IsUri),
        FieldFormat::Password => Some(IsPassword),
        FieldFormat::Uuid => Some(IsUuid),
        FieldFormat::Ipv4 => Some(IsIpv4),
        FieldFormat::Ipv6 => Some(IsIpv6),
        FieldFormat::Hostname => Some(IsHostname),
        FieldFormat::None | FieldFormat::Date | FieldFormat::DateTime | FieldFormat::Time => None,
    };
    if let Some(name) = format_flag {
        out.push(ConditionRecord::flag(name));
    }

    DerivedConditions {
        has_conditions: !out.is_empty(),
        conditions: out,
    }
}

/// Go time layout for a date/time field, taken from configuration.
pub fn time_layout(format: FieldFormat, config: &GeneratorConfig) -> Option<String> {
    match format {
        FieldFormat::Date => Some(config.date_format.clone()),
        FieldFormat::DateTime => Some(config.datetime_format.clone()),
        FieldFormat::Time => Some(config.time_format.clone()),
        _ => None,
    }
}
