use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const IMPORT_TIME: &str = "time";
const IMPORT_NET: &str = "net";
const IMPORT_SQL: &str = "database/sql";
const IMPORT_PG: &str = "github.com/go-pg/pg/v10";

/// How nullable scalar columns are represented in generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullStyle {
    /// `*T` for every nullable scalar.
    #[default]
    Pointer,
    /// `sql.Null*` / `pg.NullTime` wrappers for primitives, `*T` otherwise.
    Wrapper,
}

/// Target base types known to the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseType {
    Int,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    Bool,
    Time,
    Duration,
    JsonMap,
    HstoreMap,
    Ip,
    IpNet,
}

impl BaseType {
    /// Look up the base type for a Postgres type name.
    pub fn from_source(source_type: &str) -> Option<Self> {
        let base = match source_type {
            "int2" | "int4" | "smallint" | "integer" | "serial" | "smallserial" => BaseType::Int,
            "int8" | "bigint" | "bigserial" => BaseType::Int64,
            "float4" | "real" => BaseType::Float32,
            "float8" | "double precision" | "numeric" | "decimal" => BaseType::Float64,
            "text" | "varchar" | "character varying" | "bpchar" | "char" | "character"
            | "name" | "citext" | "uuid" | "point" => BaseType::String,
            "bytea" => BaseType::Bytes,
            "bool" | "boolean" => BaseType::Bool,
            "timestamp" | "timestamptz" | "date" | "time" | "timetz" => BaseType::Time,
            "interval" => BaseType::Duration,
            "json" | "jsonb" => BaseType::JsonMap,
            "hstore" => BaseType::HstoreMap,
            "inet" => BaseType::Ip,
            "cidr" => BaseType::IpNet,
            _ => return None,
        };
        Some(base)
    }

    /// Go spelling of the base type.
    pub fn go_name(self) -> &'static str {
        match self {
            BaseType::Int => "int",
            BaseType::Int64 => "int64",
            BaseType::Float32 => "float32",
            BaseType::Float64 => "float64",
            BaseType::String => "string",
            BaseType::Bytes => "[]byte",
            BaseType::Bool => "bool",
            BaseType::Time => "time.Time",
            BaseType::Duration => "time.Duration",
            BaseType::JsonMap => "map[string]interface{}",
            BaseType::HstoreMap => "map[string]string",
            BaseType::Ip => "net.IP",
            BaseType::IpNet => "net.IPNet",
        }
    }

    /// Package the base type lives in, if it is not a builtin.
    pub fn import(self) -> Option<&'static str> {
        match self {
            BaseType::Time | BaseType::Duration => Some(IMPORT_TIME),
            BaseType::Ip | BaseType::IpNet => Some(IMPORT_NET),
            _ => None,
        }
    }

    /// Time, interval, hstore and network types cannot be mapped to slices.
    pub fn supports_arrays(self) -> bool {
        !matches!(
            self,
            BaseType::Time
                | BaseType::Duration
                | BaseType::HstoreMap
                | BaseType::Ip
                | BaseType::IpNet
        )
    }

    /// Types with a usable zero value that are never pointer-wrapped.
    pub fn has_natural_empty(self) -> bool {
        matches!(self, BaseType::JsonMap | BaseType::HstoreMap | BaseType::Bytes)
    }

    pub fn is_integer(self) -> bool {
        matches!(self, BaseType::Int | BaseType::Int64)
    }

    fn null_wrapper(self) -> Option<NullWrapper> {
        match self {
            BaseType::Int | BaseType::Int64 => Some(NullWrapper::Int64),
            BaseType::Float32 | BaseType::Float64 => Some(NullWrapper::Float64),
            BaseType::Bool => Some(NullWrapper::Bool),
            BaseType::String => Some(NullWrapper::String),
            BaseType::Time => Some(NullWrapper::Time),
            _ => None,
        }
    }
}

/// Dedicated nullable wrapper types used under [`NullStyle::Wrapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullWrapper {
    Int64,
    Float64,
    Bool,
    String,
    Time,
}

impl NullWrapper {
    pub fn go_name(self) -> &'static str {
        match self {
            NullWrapper::Int64 => "sql.NullInt64",
            NullWrapper::Float64 => "sql.NullFloat64",
            NullWrapper::Bool => "sql.NullBool",
            NullWrapper::String => "sql.NullString",
            NullWrapper::Time => "pg.NullTime",
        }
    }

    pub fn import(self) -> &'static str {
        match self {
            NullWrapper::Time => IMPORT_PG,
            _ => IMPORT_SQL,
        }
    }
}

/// Nullability encoding chosen for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "wrapper", rename_all = "snake_case")]
pub enum Nullability {
    NotNull,
    Pointer,
    Wrapper(NullWrapper),
}

/// Fully resolved type of a known column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub base: BaseType,
    /// Slice nesting depth, `0` for scalars.
    pub dimensions: u32,
    pub nullability: Nullability,
}

impl TypeDescriptor {
    pub fn go_type(&self) -> String {
        if self.dimensions > 0 {
            return format!("{}{}", "[]".repeat(self.dimensions as usize), self.base.go_name());
        }

        match self.nullability {
            Nullability::NotNull => self.base.go_name().to_string(),
            Nullability::Pointer => format!("*{}", self.base.go_name()),
            Nullability::Wrapper(wrapper) => wrapper.go_name().to_string(),
        }
    }

    pub fn import(&self) -> Option<&'static str> {
        match self.nullability {
            Nullability::Wrapper(wrapper) if self.dimensions == 0 => Some(wrapper.import()),
            _ => self.base.import(),
        }
    }
}

/// Outcome of type mapping: a known descriptor or the opaque fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "descriptor", rename_all = "snake_case")]
pub enum ResolvedType {
    Known(TypeDescriptor),
    /// No mapping exists; renderers emit a placeholder or skip the field.
    Opaque,
}

impl ResolvedType {
    pub fn go_type(&self) -> String {
        match self {
            ResolvedType::Known(descriptor) => descriptor.go_type(),
            ResolvedType::Opaque => "interface{}".to_string(),
        }
    }

    pub fn import(&self) -> Option<&'static str> {
        match self {
            ResolvedType::Known(descriptor) => descriptor.import(),
            ResolvedType::Opaque => None,
        }
    }

    pub fn descriptor(&self) -> Option<&TypeDescriptor> {
        match self {
            ResolvedType::Known(descriptor) => Some(descriptor),
            ResolvedType::Opaque => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, ResolvedType::Opaque)
    }
}

/// Column facts the mapper needs.
#[derive(Debug, Clone, Copy)]
pub struct TypeRequest<'a> {
    pub source_type: &'a str,
    pub nullable: bool,
    pub is_array: bool,
    pub dimensions: u32,
    pub is_enum: bool,
}

/// Map a source column type to its target type.
///
/// Rules apply in order: base type lookup (enums map to strings, unknown
/// scalars fall back to [`ResolvedType::Opaque`]), array wrapping, then
/// nullability. Arrays never fall back silently: an unknown or
/// array-incompatible element type is an error.
pub fn resolve_type(request: &TypeRequest<'_>, style: NullStyle) -> Result<ResolvedType> {
    let base = if request.is_enum {
        Some(BaseType::String)
    } else {
        BaseType::from_source(request.source_type)
    };

    if request.is_array {
        let base = base
            .filter(|base| base.supports_arrays())
            .ok_or_else(|| Error::UnsupportedArrayType(request.source_type.to_string()))?;

        return Ok(ResolvedType::Known(TypeDescriptor {
            base,
            dimensions: request.dimensions.max(1),
            nullability: Nullability::NotNull,
        }));
    }

    let Some(base) = base else {
        return Ok(ResolvedType::Opaque);
    };

    let nullability = if !request.nullable || base.has_natural_empty() {
        Nullability::NotNull
    } else {
        match (style, base.null_wrapper()) {
            (NullStyle::Wrapper, Some(wrapper)) => Nullability::Wrapper(wrapper),
            _ => Nullability::Pointer,
        }
    };

    Ok(ResolvedType::Known(TypeDescriptor {
        base,
        dimensions: 0,
        nullability,
    }))
}
