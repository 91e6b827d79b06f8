use crate::{
    error::{SimError, SimResult},
    types::PartyIndex,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyConfig {
    pub name:  String,
    pub votes: u64,
}

impl PartyConfig {
    pub fn new(name: impl Into<String>, votes: u64) -> Self {
        Self { name: name.into(), votes }
    }
}

/// Regional result the electorate is synthesised from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionConfig {
    pub region: String,
    /// Declared regional turnout. Drives the per-constituency turnout
    /// target; may differ from the party sum.
    pub total_voters: u64,
    pub constituencies: u64,
    pub parties: Vec<PartyConfig>,
}

impl ElectionConfig {
    /// Load from a JSON file.
    /// In tests, use ElectionConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ElectionConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// 2019 UK general election, Scottish seats.
    pub fn scotland_2019() -> Self {
        Self {
            region: "Scotland".into(),
            total_voters: 2_759_061,
            constituencies: 59,
            parties: vec![
                PartyConfig::new("SNP", 1_242_380),
                PartyConfig::new("Conservative", 692_939),
                PartyConfig::new("Labour", 511_838),
                PartyConfig::new("Liberal Democrats", 263_417),
                PartyConfig::new("Scottish Greens", 28_122),
                PartyConfig::new("Brexit", 13_243),
                PartyConfig::new("UKIP", 3_303),
                PartyConfig::new("others", 3_819),
            ],
        }
    }

    /// Small config with hardcoded values for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            region: "Testshire".into(),
            total_voters: 1_000,
            constituencies: 10,
            parties: vec![
                PartyConfig::new("Red", 450),
                PartyConfig::new("Blue", 350),
                PartyConfig::new("Yellow", 150),
                PartyConfig::new("Green", 50),
            ],
        }
    }

    pub fn party_count(&self) -> usize {
        self.parties.len()
    }

    /// Number of voter records the pool will hold.
    /// `None` if the party totals overflow `u64`.
    pub fn electorate_size(&self) -> Option<u64> {
        self.parties.iter().try_fold(0u64, |acc, p| acc.checked_add(p.votes))
    }

    /// Ballots drawn per constituency (floor division).
    pub fn average_turnout(&self) -> u64 {
        if self.constituencies == 0 {
            return 0;
        }
        self.total_voters / self.constituencies
    }

    /// Ordered `(party, votes)` pairs for `VoterPool::initialize`.
    pub fn party_counts(&self) -> Vec<(PartyIndex, u64)> {
        self.parties.iter().enumerate().map(|(i, p)| (i, p.votes)).collect()
    }

    pub fn party_name(&self, party: PartyIndex) -> Option<&str> {
        self.parties.get(party).map(|p| p.name.as_str())
    }

    /// Reject configs that cannot complete a run.
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |reason: String| -> SimResult<()> { Err(SimError::InvalidConfig { reason }) };

        if self.parties.is_empty() {
            return invalid("no parties configured".into());
        }
        if self.constituencies == 0 {
            return invalid("constituency count must be positive".into());
        }
        let turnout = self.average_turnout();
        if turnout == 0 {
            return invalid(format!(
                "{} voters cannot fill {} constituencies",
                self.total_voters, self.constituencies
            ));
        }
        let needed = turnout.saturating_mul(self.constituencies);
        let Some(available) = self.electorate_size() else {
            return invalid("party vote totals overflow the electorate size".into());
        };
        if needed > available {
            return invalid(format!(
                "{needed} ballots needed ({turnout} x {}) but parties only hold {available}",
                self.constituencies
            ));
        }
        Ok(())
    }
}
