//! The built-in catalog: every category, unit and constant the registry loads
//!
//! Names here are the stable identifiers callers depend on.

use gauge_core::ConvertError;
use tracing::debug;
use crate::rates::{checked_rate, RateSource};
use crate::{Measurement, Unit};

pub const MEASURE_LENGTH: &str = "Length";
pub const MEASURE_WEIGHT: &str = "Weight";
pub const MEASURE_TEMPERATURE: &str = "Temperature";
pub const MEASURE_VOLUME: &str = "Volume";
pub const MEASURE_MILEAGE: &str = "Gas Mileage";
pub const MEASURE_AREA: &str = "Area";
pub const MEASURE_POWER: &str = "Power";
pub const MEASURE_PRESSURE: &str = "Pressure";
pub const MEASURE_SPEED: &str = "Speed";
pub const MEASURE_ANGLE: &str = "Angle";
pub const MEASURE_CURRENCY: &str = "Currency";

/// Alternative category names accepted by lookups
pub const CATEGORY_ALIASES: [(&str, &str); 1] = [("Angle Measurements", MEASURE_ANGLE)];

pub const UNIT_LENGTH_CM: &str = "centimeter";
pub const UNIT_LENGTH_METER: &str = "meter";
pub const UNIT_LENGTH_KM: &str = "kilometer";
pub const UNIT_LENGTH_INCH: &str = "inch";
pub const UNIT_LENGTH_FOOT: &str = "foot";
pub const UNIT_LENGTH_MILE: &str = "mile";

pub const UNIT_WEIGHT_GRAM: &str = "gram";
pub const UNIT_WEIGHT_KG: &str = "kilogram";
pub const UNIT_WEIGHT_POUND: &str = "pound";
pub const UNIT_WEIGHT_OUNCE: &str = "ounce";

pub const UNIT_TEMP_CELSIUS: &str = "celsius";
pub const UNIT_TEMP_FAHRENHEIT: &str = "fahrenheit";
pub const UNIT_TEMP_KELVIN: &str = "kelvin";

pub const UNIT_VOLUME_LITER: &str = "liter";
pub const UNIT_VOLUME_MILILITER: &str = "mililiter";
pub const UNIT_VOLUME_GALLON: &str = "gallon";
pub const UNIT_VOLUME_QUART: &str = "quart";
pub const UNIT_VOLUME_PINT: &str = "pint";
pub const UNIT_VOLUME_CUP: &str = "cup";
pub const UNIT_VOLUME_OUNCE: &str = "ounce";

pub const UNIT_MILEAGE_LPK: &str = "liters per 100 km";
pub const UNIT_MILEAGE_KPL: &str = "kilometers per liter";
pub const UNIT_MILEAGE_MPG: &str = "miles per gallon";

pub const UNIT_AREA_SQ_METER: &str = "square meter";
pub const UNIT_AREA_HECTARE: &str = "hectare";
pub const UNIT_AREA_SQ_KM: &str = "square km";
pub const UNIT_AREA_SQ_INCH: &str = "square inch";
pub const UNIT_AREA_SQ_FOOT: &str = "square foot";
pub const UNIT_AREA_SQ_YARD: &str = "square yard";
pub const UNIT_AREA_SQ_MILE: &str = "square mile";
pub const UNIT_AREA_ACRE: &str = "acre";

pub const UNIT_POWER_WATT: &str = "watt";
pub const UNIT_POWER_HORSEPOWER: &str = "horsepower";
pub const UNIT_POWER_CALORIES_PER_SECOND: &str = "calories per second";
pub const UNIT_POWER_BTU_PER_SECOND: &str = "BTU per second";
pub const UNIT_POWER_KILOWATT: &str = "kilowatt";
pub const UNIT_POWER_MEGAWATT: &str = "megawatt";

pub const UNIT_PRESSURE_PASCAL: &str = "pascal";
pub const UNIT_PRESSURE_ATMOSPHERE: &str = "atmosphere";
pub const UNIT_PRESSURE_BAR: &str = "bar";
pub const UNIT_PRESSURE_PSI: &str = "psi";
pub const UNIT_PRESSURE_TORR: &str = "torr";

pub const UNIT_SPEED_KM_PER_HOUR: &str = "kilometers per hour";
pub const UNIT_SPEED_METERS_PER_SECOND: &str = "meters per second";
pub const UNIT_SPEED_MILES_PER_HOUR: &str = "miles per hour";
pub const UNIT_SPEED_KNOTS: &str = "knots";

pub const UNIT_ANGLE_DEGREES: &str = "degrees";
pub const UNIT_ANGLE_RADIANS: &str = "radians";
pub const UNIT_ANGLE_GRADIANS: &str = "gradians";

pub const UNIT_CURRENCY_USD: &str = "U.S. Dollars";

/// Currency units and the ISO code their rate is looked up by
pub const CURRENCIES: [(&str, &str); 9] = [
    ("Euros", "EUR"),
    ("British Pounds", "GBP"),
    ("Indian Rupee", "INR"),
    ("Australian Dollars", "AUD"),
    ("Canadian Dollars", "CAD"),
    ("Singapore Dollars", "SGD"),
    ("Japanese Yen", "JPY"),
    ("Chinese Yuan", "CNY"),
    ("Russian Ruble", "RUB"),
];

/// 1 inch = 2.54 cm
const CM_PER_INCH: f64 = 2.54;
/// 1 gallon = 3.7854 liters
const LITERS_PER_GALLON: f64 = 3.7854;
/// mpg * L/100km = 235.215
const MPG_LPK: f64 = 235.215;

/// Build every category, in catalog order
pub fn build(rates: &dyn RateSource) -> Result<Vec<Measurement>, ConvertError> {
    Ok(vec![
        length()?,
        weight()?,
        temperature()?,
        volume()?,
        mileage()?,
        area()?,
        power()?,
        pressure()?,
        speed()?,
        angle()?,
        currency(rates)?,
    ])
}

/// Reference: centimeters
pub fn length() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_LENGTH);
    m.add_unit(Unit::reference(UNIT_LENGTH_CM))?;
    m.add_unit(Unit::linear(UNIT_LENGTH_METER, 0.01)?)?;
    m.add_unit(Unit::linear(UNIT_LENGTH_KM, 0.00001)?)?;
    m.add_unit(Unit::linear(UNIT_LENGTH_INCH, 1.0 / CM_PER_INCH)?)?;
    m.add_unit(Unit::linear(UNIT_LENGTH_FOOT, 1.0 / (12.0 * CM_PER_INCH))?)?;
    m.add_unit(Unit::linear(UNIT_LENGTH_MILE, 1.0 / (CM_PER_INCH * 12.0 * 5280.0))?)?;

    aliases(&mut m, &[
        ("cm", UNIT_LENGTH_CM),
        ("m", UNIT_LENGTH_METER),
        ("km", UNIT_LENGTH_KM),
        ("in", UNIT_LENGTH_INCH),
        ("ft", UNIT_LENGTH_FOOT),
        ("mi", UNIT_LENGTH_MILE),
    ])?;
    Ok(m)
}

/// Reference: grams (1 kg = 2.2 pounds)
pub fn weight() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_WEIGHT);
    m.add_unit(Unit::reference(UNIT_WEIGHT_GRAM))?;
    m.add_unit(Unit::linear(UNIT_WEIGHT_KG, 0.001)?)?;
    m.add_unit(Unit::linear(UNIT_WEIGHT_POUND, 2.2 / 1000.0)?)?;
    m.add_unit(Unit::linear(UNIT_WEIGHT_OUNCE, (2.2 * 16.0) / 1000.0)?)?;

    aliases(&mut m, &[
        ("g", UNIT_WEIGHT_GRAM),
        ("kg", UNIT_WEIGHT_KG),
        ("lb", UNIT_WEIGHT_POUND),
        ("oz", UNIT_WEIGHT_OUNCE),
    ])?;
    Ok(m)
}

/// Reference: celsius (F = C * 1.8 + 32)
pub fn temperature() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_TEMPERATURE).with_decimal_places(1);
    m.add_unit(Unit::reference(UNIT_TEMP_CELSIUS))?;
    m.add_unit(Unit::affine(UNIT_TEMP_FAHRENHEIT, 1.8, 32.0)?)?;
    m.add_unit(Unit::affine(UNIT_TEMP_KELVIN, 1.0, 273.15)?)?;

    aliases(&mut m, &[
        ("C", UNIT_TEMP_CELSIUS),
        ("F", UNIT_TEMP_FAHRENHEIT),
        ("K", UNIT_TEMP_KELVIN),
    ])?;
    Ok(m)
}

/// Reference: liters
pub fn volume() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_VOLUME);
    m.add_unit(Unit::reference(UNIT_VOLUME_LITER))?;
    m.add_unit(Unit::linear(UNIT_VOLUME_MILILITER, 1000.0)?)?;
    m.add_unit(Unit::linear(UNIT_VOLUME_GALLON, 1.0 / LITERS_PER_GALLON)?)?;
    // 1 gallon = 4 quarts = 8 pints = 16 cups = 128 ounces
    m.add_unit(Unit::linear(UNIT_VOLUME_QUART, 4.0 / LITERS_PER_GALLON)?)?;
    m.add_unit(Unit::linear(UNIT_VOLUME_PINT, 8.0 / LITERS_PER_GALLON)?)?;
    m.add_unit(Unit::linear(UNIT_VOLUME_CUP, 16.0 / LITERS_PER_GALLON)?)?;
    m.add_unit(Unit::linear(UNIT_VOLUME_OUNCE, 128.0 / LITERS_PER_GALLON)?)?;

    aliases(&mut m, &[
        ("l", UNIT_VOLUME_LITER),
        ("ml", UNIT_VOLUME_MILILITER),
        ("milliliter", UNIT_VOLUME_MILILITER),
        ("gal", UNIT_VOLUME_GALLON),
        ("qt", UNIT_VOLUME_QUART),
        ("pt", UNIT_VOLUME_PINT),
        ("fl oz", UNIT_VOLUME_OUNCE),
    ])?;
    Ok(m)
}

/// Reference: liters per 100 km
pub fn mileage() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_MILEAGE);
    m.add_unit(Unit::reference(UNIT_MILEAGE_LPK))?;
    m.add_unit(Unit::reciprocal(UNIT_MILEAGE_KPL, 100.0)?)?;
    m.add_unit(Unit::reciprocal(UNIT_MILEAGE_MPG, MPG_LPK)?)?;

    aliases(&mut m, &[
        ("L/100km", UNIT_MILEAGE_LPK),
        ("km/L", UNIT_MILEAGE_KPL),
        ("mpg", UNIT_MILEAGE_MPG),
    ])?;
    Ok(m)
}

/// Reference: square meters
pub fn area() -> Result<Measurement, ConvertError> {
    let sq_mile = (100.0 / (12.0 * 5280.0 * CM_PER_INCH)).powi(2);

    let mut m = Measurement::new(MEASURE_AREA);
    m.add_unit(Unit::reference(UNIT_AREA_SQ_METER))?;
    m.add_unit(Unit::linear(UNIT_AREA_HECTARE, 0.01_f64.powi(2))?)?;
    m.add_unit(Unit::linear(UNIT_AREA_SQ_KM, 0.001_f64.powi(2))?)?;
    m.add_unit(Unit::linear(UNIT_AREA_SQ_INCH, (100.0 / CM_PER_INCH).powi(2))?)?;
    m.add_unit(Unit::linear(UNIT_AREA_SQ_FOOT, (100.0 / (12.0 * CM_PER_INCH)).powi(2))?)?;
    m.add_unit(Unit::linear(UNIT_AREA_SQ_YARD, (100.0 / (12.0 * 3.0 * CM_PER_INCH)).powi(2))?)?;
    m.add_unit(Unit::linear(UNIT_AREA_SQ_MILE, sq_mile)?)?;
    m.add_unit(Unit::linear(UNIT_AREA_ACRE, sq_mile * 640.0)?)?;

    aliases(&mut m, &[
        ("sq meter", UNIT_AREA_SQ_METER),
        ("ha", UNIT_AREA_HECTARE),
        ("sq km", UNIT_AREA_SQ_KM),
        ("sq inch", UNIT_AREA_SQ_INCH),
        ("sq foot", UNIT_AREA_SQ_FOOT),
        ("sq yard", UNIT_AREA_SQ_YARD),
        ("sq mile", UNIT_AREA_SQ_MILE),
    ])?;
    Ok(m)
}

/// Reference: watts
pub fn power() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_POWER).with_decimal_places(3);
    m.add_unit(Unit::reference(UNIT_POWER_WATT))?;
    m.add_unit(Unit::linear(UNIT_POWER_HORSEPOWER, 1.0 / 745.699872)?)?;
    m.add_unit(Unit::linear(UNIT_POWER_CALORIES_PER_SECOND, 0.239005736)?)?;
    m.add_unit(Unit::linear(UNIT_POWER_BTU_PER_SECOND, 0.00094781712)?)?;
    m.add_unit(Unit::linear(UNIT_POWER_KILOWATT, 1.0 / 1000.0)?)?;
    m.add_unit(Unit::linear(UNIT_POWER_MEGAWATT, 1.0 / 1_000_000.0)?)?;

    aliases(&mut m, &[
        ("W", UNIT_POWER_WATT),
        ("hp", UNIT_POWER_HORSEPOWER),
        ("calories/sec", UNIT_POWER_CALORIES_PER_SECOND),
        ("BTU/sec", UNIT_POWER_BTU_PER_SECOND),
        ("kW", UNIT_POWER_KILOWATT),
        ("MW", UNIT_POWER_MEGAWATT),
    ])?;
    Ok(m)
}

/// Reference: pascals
pub fn pressure() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_PRESSURE);
    m.add_unit(Unit::reference(UNIT_PRESSURE_PASCAL))?;
    m.add_unit(Unit::linear(UNIT_PRESSURE_ATMOSPHERE, 1.0 / 101325.0)?)?;
    m.add_unit(Unit::linear(UNIT_PRESSURE_BAR, 1.0 / 100000.0)?)?;
    m.add_unit(Unit::linear(UNIT_PRESSURE_PSI, 1.0 / 6894.75729)?)?;
    m.add_unit(Unit::linear(UNIT_PRESSURE_TORR, 1.0 / 133.322368)?)?;

    aliases(&mut m, &[
        ("Pa", UNIT_PRESSURE_PASCAL),
        ("atm", UNIT_PRESSURE_ATMOSPHERE),
    ])?;
    Ok(m)
}

/// Reference: kilometers per hour
pub fn speed() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_SPEED);
    m.add_unit(Unit::reference(UNIT_SPEED_KM_PER_HOUR))?;
    m.add_unit(Unit::linear(UNIT_SPEED_METERS_PER_SECOND, 1.0 / 3.6)?)?;
    m.add_unit(Unit::linear(UNIT_SPEED_MILES_PER_HOUR, 1.0 / 1.609344)?)?;
    m.add_unit(Unit::linear(UNIT_SPEED_KNOTS, 0.539956803)?)?;

    aliases(&mut m, &[
        ("km/h", UNIT_SPEED_KM_PER_HOUR),
        ("m/s", UNIT_SPEED_METERS_PER_SECOND),
        ("mph", UNIT_SPEED_MILES_PER_HOUR),
        ("kn", UNIT_SPEED_KNOTS),
    ])?;
    Ok(m)
}

/// Reference: degrees
pub fn angle() -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_ANGLE);
    m.add_unit(Unit::reference(UNIT_ANGLE_DEGREES))?;
    m.add_unit(Unit::linear(UNIT_ANGLE_RADIANS, 1.0 / 57.2957795)?)?;
    m.add_unit(Unit::linear(UNIT_ANGLE_GRADIANS, 1.0 / 0.9)?)?;

    aliases(&mut m, &[
        ("deg", UNIT_ANGLE_DEGREES),
        ("rad", UNIT_ANGLE_RADIANS),
        ("grad", UNIT_ANGLE_GRADIANS),
    ])?;
    Ok(m)
}

/// Reference: U.S. dollars; every other factor comes from `rates`
pub fn currency(rates: &dyn RateSource) -> Result<Measurement, ConvertError> {
    let mut m = Measurement::new(MEASURE_CURRENCY);
    m.add_unit(Unit::reference(UNIT_CURRENCY_USD))?;
    m.add_alias("USD", UNIT_CURRENCY_USD)?;

    for (name, code) in CURRENCIES {
        let rate = checked_rate(rates, code)?;
        debug!(currency = code, rate, "loaded exchange rate");
        m.add_unit(Unit::linear(name, rate)?)?;
        m.add_alias(code, name)?;
    }
    Ok(m)
}

fn aliases(m: &mut Measurement, pairs: &[(&str, &str)]) -> Result<(), ConvertError> {
    for (alias, unit) in pairs {
        m.add_alias(alias, unit)?;
    }
    Ok(())
}
