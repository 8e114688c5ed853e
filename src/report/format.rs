//! Plain-text formatting of summaries.

use crate::data::MicroSecondTasData;
use crate::domain::{ScientificValue, ValueRange, Wavelength};
use crate::fit::{DecayFunction, DecayFunctionModel, FitRange, ModelRegistry, time_constant_text};
use crate::report::DatasetSummary;

/// Dataset summary block, as printed by `tas load` and `tas info`.
pub fn format_dataset_summary(data: &MicroSecondTasData) -> String {
    let s = DatasetSummary::of(data);
    let mut out = String::new();

    out.push_str(&format!("=== {} ({}) ===\n", s.sample_name, s.tas_type));
    match s.wavelength_range {
        Some((min, max)) => out.push_str(&format!(
            "Wavelengths: n={} | [{}, {}]\n",
            s.wavelength_count,
            ScientificValue::new(min),
            ScientificValue::new(max)
        )),
        None => out.push_str("Wavelengths: n=0\n"),
    }
    out.push_str(&format!(
        "Times: n={} | [{}, {}]\n",
        s.time_count,
        ScientificValue::new(s.time_range.0),
        ScientificValue::new(s.time_range.1)
    ));
    match s.t0_channels {
        Some(used) => out.push_str(&format!(
            "t0: {} (from {used} of {} channels)\n",
            ScientificValue::new(s.t0),
            s.channel_count
        )),
        None => out.push_str(&format!("t0: {} (custom)\n", ScientificValue::new(s.t0))),
    }
    out.push_str(&format!(
        "Raw files: {} | background: {}\n",
        s.raw_file_count,
        if s.has_background { "subtracted" } else { "none" }
    ));

    let ranges = &data.analysis.spectra_ranges;
    if !ranges.is_empty() {
        let labels: Vec<String> = ranges.iter().map(ValueRange::label).collect();
        out.push_str(&format!("Spectra ranges: {}\n", labels.join(", ")));
    }
    if !data.metadata.comment.is_empty() {
        out.push_str(&format!("Comment: {}\n", data.metadata.comment));
    }
    out
}

/// Fit result block for one decay trace.
pub fn format_fit_summary(
    wavelengths: &ValueRange<Wavelength>,
    model: &dyn DecayFunctionModel,
    range: &FitRange,
    function: &dyn DecayFunction,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Decay: {}\n", wavelengths.label()));
    out.push_str(&format!("Model: {} ({})\n", model.display_name(), model.id()));
    if range.start.is_some() || range.end.is_some() {
        out.push_str(&format!("Fit range: {}\n", range.label()));
    }
    for (i, (a, t)) in function.terms().iter().enumerate() {
        out.push_str(&format!(
            "  a{} = {:<14} t{} = {}\n",
            i + 1,
            ScientificValue::new(*a).text(),
            i + 1,
            ScientificValue::new(*t)
        ));
    }
    out.push_str(&format!("Time constant: {}\n", time_constant_text(function)));
    out
}

/// One line per registered model: `<id>  <display name>`.
pub fn format_models(registry: &ModelRegistry) -> String {
    let width = registry.ids().iter().map(|id| id.len()).max().unwrap_or(0);
    registry
        .iter()
        .map(|m| format!("{:<width$}  {}\n", m.id(), m.display_name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LoadConfig, SyntheticParams, synthetic_channels};
    use crate::fit::ExponentialsDecay;

    #[test]
    fn models_are_listed() {
        let text = format_models(&ModelRegistry::default());
        assert_eq!(text, "1exp  Single exponential decay\n2exp  Double exponential decay\n");
    }

    #[test]
    fn fit_summary_lists_terms() {
        let registry = ModelRegistry::default();
        let model = registry.get("2exp").unwrap();
        let f = ExponentialsDecay::new(vec![1e-3, 3e-3], vec![1e-6, 5e-6]).unwrap();
        let wl = ValueRange::new(Wavelength::new(500.0).unwrap(), Wavelength::new(520.0).unwrap());
        let text = format_fit_summary(&wl, model, &FitRange::default(), &f);

        assert!(text.starts_with("Decay: 500 nm - 520 nm\nModel: Double exponential decay (2exp)\n"));
        assert!(text.contains("a1 = 1 mOD"));
        assert!(text.contains("t2 = 5 us"));
        assert!(text.ends_with("Time constant: 4 us\n"));
        assert!(!text.contains("Fit range"));
    }

    #[test]
    fn dataset_summary_counts() {
        let params = SyntheticParams {
            wavelengths_nm: vec![500.0, 550.0],
            time_count: 20,
            t0: 3e-7,
            ..SyntheticParams::default()
        };
        let config = LoadConfig::default();
        let raw = synthetic_channels(&params, &config).unwrap();
        let data = MicroSecondTasData::assemble("film", raw, &config, None).unwrap();

        let s = DatasetSummary::of(&data);
        assert_eq!(s.wavelength_count, 2);
        assert_eq!(s.time_count, 20);
        assert_eq!(s.channel_count, 2);
        assert_eq!(s.raw_file_count, 8);
        assert_eq!(s.t0_channels, Some(2));

        let text = format_dataset_summary(&data);
        assert!(text.starts_with("=== film (µs-TAS) ===\n"));
        assert!(text.contains("Wavelengths: n=2 | [500 nm, 550 nm]\n"));
        assert!(text.contains("t0: 300 ns (from 2 of 2 channels)\n"));
        assert!(text.contains("Times: n=20 | [-300 ns, 1.6 us]\n"));
    }
}
