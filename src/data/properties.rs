/// Operator-entered description of the sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalInputs {
    pub sample_name: String,
    pub thickness_mm: f64,
    pub weight_g: f64,
    pub width_mm: f64,
    pub length_mm: f64,
    pub heat_setting: String,
    pub pressure: String,
    /// `YYYY-MM-DD`.
    pub evaluation_date: String,
    pub remarks: String,
}

/// Properties derived from the sample dimensions. Always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculatedProperties {
    /// g/m²
    pub areal_weight: f64,
    /// kg/m³
    pub density: f64,
}

impl CalculatedProperties {
    /// Areal weight and density from a rectangular sample.
    ///
    /// A zero area or volume yields `0.0` for the dependent value instead
    /// of an infinite or NaN result. So does any intermediate that leaves
    /// the `f64` range.
    pub fn compute(thickness_mm: f64, weight_g: f64, width_mm: f64, length_mm: f64) -> Self {
        let area_m2 = (width_mm * length_mm) / 1_000_000.0;
        let areal_weight = finite_ratio(weight_g, area_m2);

        let mass_kg = weight_g / 1000.0;
        let thickness_m = thickness_mm / 1000.0;
        let volume_m3 = area_m2 * thickness_m;
        let density = finite_ratio(mass_kg, volume_m3);

        Self {
            areal_weight,
            density,
        }
    }

    pub fn from_inputs(inputs: &PhysicalInputs) -> Self {
        let props = Self::compute(
            inputs.thickness_mm,
            inputs.weight_g,
            inputs.width_mm,
            inputs.length_mm,
        );
        log::info!(
            "Areal weight {:.2} g/m², density {:.2} kg/m³",
            props.areal_weight,
            props.density
        );
        props
    }
}

/// `numerator / divisor`, or `0.0` when the divisor is zero or the result
/// is not finite.
fn finite_ratio(numerator: f64, divisor: f64) -> f64 {
    if divisor == 0.0 || !divisor.is_finite() {
        return 0.0;
    }
    let ratio = numerator / divisor;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Round half away from zero to two decimals, as written into the report.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
