use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    DeltaP,
    DeltaPi,
    Pe,
    Area,
}

impl ParamId {
    pub const ALL: [ParamId; 4] = [ParamId::DeltaP, ParamId::DeltaPi, ParamId::Pe, ParamId::Area];

    pub fn range(self) -> ParamRange {
        match self {
            ParamId::DeltaP => ParamRange::new(0.0, 50.0, 0.1),
            ParamId::DeltaPi => ParamRange::new(0.0, 30.0, 0.1),
            ParamId::Pe => ParamRange::new(0.1, 5.0, 0.1),
            ParamId::Area => ParamRange::new(1.0, 50.0, 1.0),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ParamId::DeltaP => "ΔP",
            ParamId::DeltaPi => "Δπ",
            ParamId::Pe => "Pe",
            ParamId::Area => "A",
        }
    }

    pub fn unit(self) -> Option<&'static str> {
        match self {
            ParamId::DeltaP | ParamId::DeltaPi => Some("mmHg"),
            ParamId::Pe => None,
            ParamId::Area => Some("cm²"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamId::DeltaP => "Hydrostatic Pressure Gradient (ΔP) mmHg",
            ParamId::DeltaPi => "Oncotic Pressure Gradient (Δπ) mmHg",
            ParamId::Pe => "Hydraulic Permeability (Pe)",
            ParamId::Area => "Membrane Area (A) cm²",
        }
    }
}

/// Host-supplied bounds for one input, with the step its control moves in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamps into `[min, max]` and snaps onto the step grid anchored at `min`.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = round_to(self.min + steps * self.step, self.decimals());
        snapped.clamp(self.min, self.max)
    }

    fn decimals(&self) -> i32 {
        let mut decimals = 0;
        let mut step = self.step;
        while step.fract().abs() > 1e-9 && decimals < 6 {
            step *= 10.0;
            decimals += 1;
        }
        decimals
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub delta_p: f64,
    pub delta_pi: f64,
    pub pe: f64,
    pub area: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            delta_p: 20.0,
            delta_pi: 10.0,
            pe: 1.0,
            area: 10.0,
        }
    }
}

impl Parameters {
    pub fn get(&self, id: ParamId) -> f64 {
        match id {
            ParamId::DeltaP => self.delta_p,
            ParamId::DeltaPi => self.delta_pi,
            ParamId::Pe => self.pe,
            ParamId::Area => self.area,
        }
    }

    fn slot(&mut self, id: ParamId) -> &mut f64 {
        match id {
            ParamId::DeltaP => &mut self.delta_p,
            ParamId::DeltaPi => &mut self.delta_pi,
            ParamId::Pe => &mut self.pe,
            ParamId::Area => &mut self.area,
        }
    }

    /// Filtration rate at an arbitrary hydrostatic gradient, holding the rest fixed.
    pub fn flux_at(&self, delta_p: f64) -> f64 {
        self.pe * (delta_p - self.delta_pi)
    }

    pub fn derived(&self) -> DerivedOutput {
        let j = self.flux_at(self.delta_p);
        DerivedOutput { j, q: j * self.area }
    }

    /// Current value of every input with its unit, e.g. `ΔP = 20 mmHg  …  A = 10 cm²`.
    pub fn readout(&self) -> String {
        ParamId::ALL
            .iter()
            .map(|&id| match id.unit() {
                Some(unit) => format!("{} = {} {unit}", id.symbol(), self.get(id)),
                None => format!("{} = {}", id.symbol(), self.get(id)),
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedOutput {
    pub j: f64,
    pub q: f64,
}

impl DerivedOutput {
    pub fn readout(&self) -> String {
        format!("J = {:.2}  q = {:.2}", self.j, self.q)
    }
}

/// Single source of truth for the four inputs. Derived values are computed on every
/// read rather than stored.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: Parameters,
}

impl ParameterStore {
    pub fn new(initial: Parameters) -> Self {
        let mut store = Self::default();
        for id in ParamId::ALL {
            store.set(id, initial.get(id));
        }
        store
    }

    pub fn params(&self) -> Parameters {
        self.params
    }

    pub fn get(&self, id: ParamId) -> f64 {
        self.params.get(id)
    }

    pub fn derived(&self) -> DerivedOutput {
        self.params.derived()
    }

    /// Writes a direct control input, snapped to its range. Returns whether the stored
    /// value changed.
    pub fn set(&mut self, id: ParamId, value: f64) -> bool {
        let snapped = id.range().snap(value);
        let slot = self.params.slot(id);
        if *slot == snapped {
            return false;
        }
        *slot = snapped;
        true
    }

    /// Writes a value that the caller already clamped and quantized.
    pub fn set_raw(&mut self, id: ParamId, value: f64) -> bool {
        let slot = self.params.slot(id);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    pub fn nudge(&mut self, id: ParamId, steps: f64) -> bool {
        let range = id.range();
        self.set(id, self.get(id) + steps * range.step)
    }

    pub fn reset(&mut self, defaults: Parameters) {
        *self = Self::new(defaults);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_a() {
        let out = Parameters::default().derived();
        assert!((out.j - 10.0).abs() < 1e-9);
        assert!((out.q - 100.0).abs() < 1e-9);
        assert_eq!(out.readout(), "J = 10.00  q = 100.00");
    }

    #[test]
    fn test_scenario_b_reabsorption() {
        let params = Parameters {
            delta_p: 5.0,
            delta_pi: 10.0,
            pe: 2.0,
            area: 5.0,
        };
        let out = params.derived();
        assert!((out.j + 10.0).abs() < 1e-9);
        assert!((out.q + 50.0).abs() < 1e-9);
        assert_eq!(out.readout(), "J = -10.00  q = -50.00");
    }

    #[test]
    fn test_flux_is_zero_at_oncotic_gradient() {
        for pi_tenths in 0..=300 {
            let delta_pi = pi_tenths as f64 / 10.0;
            for pe_tenths in [1, 7, 10, 33, 50] {
                let params = Parameters {
                    delta_pi,
                    pe: pe_tenths as f64 / 10.0,
                    ..Parameters::default()
                };
                assert_eq!(params.flux_at(delta_pi), 0.0);
            }
        }
    }

    #[test]
    fn test_derived_identities() {
        let mut store = ParameterStore::default();
        for (dp, dpi, pe, a) in [(0.0, 30.0, 5.0, 50.0), (50.0, 0.0, 0.1, 1.0), (12.3, 4.5, 2.2, 17.0)] {
            store.set(ParamId::DeltaP, dp);
            store.set(ParamId::DeltaPi, dpi);
            store.set(ParamId::Pe, pe);
            store.set(ParamId::Area, a);
            let p = store.params();
            let out = store.derived();
            assert!((out.j - p.pe * (p.delta_p - p.delta_pi)).abs() < 1e-9);
            assert!((out.q - out.j * p.area).abs() < 1e-9);
        }
    }

    #[test]
    fn test_set_clamps_and_snaps() {
        let mut store = ParameterStore::default();
        store.set(ParamId::Pe, 0.0);
        assert_eq!(store.get(ParamId::Pe), 0.1);
        store.set(ParamId::Pe, 2.26);
        assert_eq!(store.get(ParamId::Pe), 2.3);
        store.set(ParamId::Area, 7.4);
        assert_eq!(store.get(ParamId::Area), 7.0);
        store.set(ParamId::DeltaPi, 99.0);
        assert_eq!(store.get(ParamId::DeltaPi), 30.0);
    }

    #[test]
    fn test_nudge_reports_change() {
        let mut store = ParameterStore::default();
        assert!(store.nudge(ParamId::DeltaPi, 1.0));
        assert_eq!(store.get(ParamId::DeltaPi), 10.1);
        store.set(ParamId::Area, 50.0);
        assert!(!store.nudge(ParamId::Area, 1.0));
    }

    #[test]
    fn test_parameter_readout_lists_every_input() {
        assert_eq!(
            Parameters::default().readout(),
            "ΔP = 20 mmHg  Δπ = 10 mmHg  Pe = 1  A = 10 cm²"
        );
        let mut store = ParameterStore::new(Parameters::default());
        store.set_raw(ParamId::DeltaP, 30.3);
        store.set(ParamId::Pe, 2.5);
        assert_eq!(
            store.params().readout(),
            "ΔP = 30.3 mmHg  Δπ = 10 mmHg  Pe = 2.5  A = 10 cm²"
        );
    }
}
