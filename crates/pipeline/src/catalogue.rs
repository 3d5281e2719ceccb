//! Climate models and experiments the downscaling has been set up for.

/// CMIP6 models with prepared inputs.
pub const KNOWN_MODELS: [&str; 10] = [
    "CanESM5",
    "CESM2",
    "CESM2-WACCM",
    "CMCC-CM2-HR4",
    "CMCC-CM2-SR5",
    "CMCC-ESM2",
    "FGOALS-g3",
    "GFDL-ESM4",
    "MIROC6",
    "MPI-ESM1-2-LR",
];

/// Shared socioeconomic pathway experiments.
pub const KNOWN_EXPERIMENTS: [&str; 4] = ["ssp126", "ssp245", "ssp370", "ssp585"];

/// Whether `model` is in [`KNOWN_MODELS`].
pub fn is_known_model(model: &str) -> bool {
    KNOWN_MODELS.contains(&model)
}

/// Whether `experiment` is in [`KNOWN_EXPERIMENTS`].
pub fn is_known_experiment(experiment: &str) -> bool {
    KNOWN_EXPERIMENTS.contains(&experiment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_exact() {
        assert!(is_known_model("MPI-ESM1-2-LR"));
        assert!(!is_known_model("mpi-esm1-2-lr"));
        assert!(is_known_experiment("ssp370"));
        assert!(!is_known_experiment("historical"));
    }
}
