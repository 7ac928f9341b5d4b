//! Built-in conversion functions

use gauge_core::{round_half_up, ErrorReport, Value};
use gauge_plugin::{ArgMeta, EvalContext, FunctionMeta, FunctionPlugin};
use gauge_units::{Conversion, Measurement, Unit};

use crate::helpers::{extract_number, extract_optional_places, extract_text, report};

// ============ convert ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 5] = [
    ArgMeta::required("category", "Text", "Measurement category, e.g. \"Length\""),
    ArgMeta::required("from", "Text", "Unit the value is expressed in"),
    ArgMeta::required("to", "Text", "Unit to convert to"),
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::optional("places", "Number", "Decimal places to round to", "category precision"),
];

static CONVERT_EXAMPLES: [&str; 4] = [
    "convert(\"Length\", \"inch\", \"centimeter\", 1) → 2.54",
    "convert(\"Temperature\", \"celsius\", \"fahrenheit\", 0) → 32.0",
    "convert(\"Gas Mileage\", \"mpg\", \"L/100km\", 30) → 7.84",
    "convert(\"Currency\", \"USD\", \"EUR\", 100, 4) → 92.68",
];

static CONVERT_RELATED: [&str; 2] = ["list_units", "describe"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert a value between two units of the same category",
            usage: "convert(category, from, to, value, [places])",
            args: &CONVERT_ARGS,
            returns: "Number",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        convert(args, ctx).into()
    }
}

fn convert(args: &[Value], ctx: &EvalContext) -> Result<f64, ErrorReport> {
    if args.len() < 4 {
        return Err(ErrorReport::arg_count("convert", 4, args.len()));
    }
    let category = extract_text(&args[0], "convert", "category")?;
    let from = extract_text(&args[1], "convert", "from")?;
    let to = extract_text(&args[2], "convert", "to")?;
    let value = extract_number(&args[3], "convert", "value")?;
    let places = extract_optional_places(args, 4, "convert")?;

    let registry = &ctx.measurements;
    let measurement = registry
        .get_measurement(category)
        .map_err(|e| report(e, registry))?;

    match places.or(ctx.decimal_places) {
        Some(places) => measurement
            .convert_unrounded(from, to, value)
            .map(|v| round_half_up(v, places)),
        None => measurement.convert(from, to, value),
    }
    .map_err(|e| report(e, registry))
}

// ============ list_categories ============

pub struct ListCategories;

static LIST_CATEGORIES_EXAMPLES: [&str; 1] = [
    "list_categories() → [\"Angle\", \"Area\", \"Currency\", ...]",
];

static LIST_CATEGORIES_RELATED: [&str; 1] = ["list_units"];

impl FunctionPlugin for ListCategories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_categories",
            description: "List every measurement category in alphabetical order",
            usage: "list_categories()",
            args: &[],
            returns: "List",
            examples: &LIST_CATEGORIES_EXAMPLES,
            category: "units",
            related: &LIST_CATEGORIES_RELATED,
        }
    }

    fn call(&self, _args: &[Value], ctx: &EvalContext) -> Value {
        Value::List(ctx.measurements.entries().map(Value::from).collect())
    }
}

// ============ list_units ============

pub struct ListUnits;

static LIST_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "Text", "Measurement category"),
];

static LIST_UNITS_EXAMPLES: [&str; 1] = [
    "list_units(\"Temperature\") → {category: \"Temperature\", reference: \"celsius\", decimal_places: 1, units: [...]}",
];

static LIST_UNITS_RELATED: [&str; 3] = ["list_categories", "describe", "convert"];

impl FunctionPlugin for ListUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_units",
            description: "List the units of a category with their conversion rules",
            usage: "list_units(category)",
            args: &LIST_UNITS_ARGS,
            returns: "Object",
            examples: &LIST_UNITS_EXAMPLES,
            category: "units",
            related: &LIST_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        list_units(args, ctx).into()
    }
}

fn list_units(args: &[Value], ctx: &EvalContext) -> Result<Value, ErrorReport> {
    let category = extract_text(args.first().unwrap_or(&Value::Null), "list_units", "category")?;
    let registry = &ctx.measurements;
    let measurement = registry
        .get_measurement(category)
        .map_err(|e| report(e, registry))?;
    Ok(measurement_table(measurement))
}

/// A category and all its units as a Value
pub fn measurement_table(measurement: &Measurement) -> Value {
    let units = measurement
        .units()
        .map(|u| unit_entry(measurement, u))
        .collect();

    Value::object([
        ("category", Value::from(measurement.name())),
        (
            "reference",
            measurement
                .reference_unit()
                .map(|u| Value::from(u.name.as_str()))
                .unwrap_or_default(),
        ),
        ("decimal_places", Value::from(measurement.decimal_places() as i64)),
        ("units", Value::List(units)),
    ])
}

fn unit_entry(measurement: &Measurement, unit: &Unit) -> Value {
    let aliases = measurement
        .aliases_of(&unit.name)
        .into_iter()
        .map(Value::from)
        .collect();

    let mut entries = vec![
        ("name", Value::from(unit.name.as_str())),
        ("kind", Value::from(unit.conversion.kind())),
    ];
    match unit.conversion {
        Conversion::Linear { factor } => entries.push(("factor", Value::from(factor))),
        Conversion::Affine { scale, offset } => {
            entries.push(("scale", Value::from(scale)));
            entries.push(("offset", Value::from(offset)));
        }
        Conversion::Reciprocal { constant } => entries.push(("constant", Value::from(constant))),
    }
    entries.push(("aliases", Value::List(aliases)));
    Value::object(entries)
}

// ============ describe ============

pub struct Describe;

static DESCRIBE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("category", "Text", "Measurement category"),
    ArgMeta::required("unit", "Text", "Unit name or alias"),
];

static DESCRIBE_EXAMPLES: [&str; 2] = [
    "describe(\"Temperature\", \"F\") → {name: \"fahrenheit\", kind: \"affine\", scale: 1.8, offset: 32, ...}",
    "describe(\"Length\", \"in\") → {name: \"inch\", kind: \"linear\", factor: 0.3937..., ...}",
];

static DESCRIBE_RELATED: [&str; 2] = ["list_units", "convert"];

impl FunctionPlugin for Describe {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "describe",
            description: "Describe one unit: canonical name, conversion rule and aliases",
            usage: "describe(category, unit)",
            args: &DESCRIBE_ARGS,
            returns: "Object",
            examples: &DESCRIBE_EXAMPLES,
            category: "units",
            related: &DESCRIBE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        describe(args, ctx).into()
    }
}

fn describe(args: &[Value], ctx: &EvalContext) -> Result<Value, ErrorReport> {
    if args.len() < 2 {
        return Err(ErrorReport::arg_count("describe", 2, args.len()));
    }
    let category = extract_text(&args[0], "describe", "category")?;
    let name = extract_text(&args[1], "describe", "unit")?;

    let registry = &ctx.measurements;
    let measurement = registry
        .get_measurement(category)
        .map_err(|e| report(e, registry))?;
    let unit = measurement.unit(name).map_err(|e| report(e, registry))?;

    let Value::Object(mut entry) = unit_entry(measurement, unit) else {
        return Err(ErrorReport::internal("unit entry is not an object"));
    };
    entry.insert("category".to_string(), Value::from(measurement.name()));
    entry.insert("reference".to_string(), Value::from(unit.is_reference()));
    Ok(Value::Object(entry))
}
