//! Equalizer presets and their filter-graph expansion

/// One peaking-filter stage of the audio-processing graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqStage {
    pub frequency_hz: f64,
    pub gain_db: f64,
}

/// Named equalizer curves offered to the listener
///
/// Each preset expands to the ordered filter stages the transport must
/// install. `Flat` expands to no stages at all, meaning "bypass".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EqPreset {
    #[default]
    Flat,
    Bass,
    Treble,
    Vocal,
    Rock,
}

impl EqPreset {
    /// The ordered filter stages this preset installs
    pub fn stages(&self) -> Vec<EqStage> {
        let gains: &[(f64, f64)] = match self {
            EqPreset::Flat => &[],
            EqPreset::Bass => &[(60.0, 6.0), (170.0, 4.0), (310.0, 1.5)],
            EqPreset::Treble => &[(3600.0, 2.0), (6000.0, 4.0), (14000.0, 6.0)],
            EqPreset::Vocal => &[(310.0, -2.0), (1000.0, 4.0), (3600.0, 3.0)],
            EqPreset::Rock => &[
                (60.0, 5.0),
                (310.0, -2.0),
                (1000.0, -1.0),
                (6000.0, 3.0),
                (14000.0, 4.0),
            ],
        };
        gains
            .iter()
            .map(|&(frequency_hz, gain_db)| EqStage {
                frequency_hz,
                gain_db,
            })
            .collect()
    }

    /// Display name of the preset
    pub fn name(&self) -> &'static str {
        match self {
            EqPreset::Flat => "Flat",
            EqPreset::Bass => "Bass",
            EqPreset::Treble => "Treble",
            EqPreset::Vocal => "Vocal",
            EqPreset::Rock => "Rock",
        }
    }

    /// All presets, in presentation order
    pub fn all() -> &'static [EqPreset] {
        &[
            EqPreset::Flat,
            EqPreset::Bass,
            EqPreset::Treble,
            EqPreset::Vocal,
            EqPreset::Rock,
        ]
    }
}
