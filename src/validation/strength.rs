//! Password strength meter

/// One independent strength requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrengthRule {
    MinLength,
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl StrengthRule {
    /// Evaluation order, also the display order of the requirement list
    pub const ALL: [StrengthRule; 5] = [
        Self::MinLength,
        Self::Lowercase,
        Self::Uppercase,
        Self::Digit,
        Self::Symbol,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::MinLength => "length",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::Digit => "digit",
            Self::Symbol => "symbol",
        }
    }

    fn is_satisfied(&self, password: &str, min_length: usize) -> bool {
        match self {
            Self::MinLength => password.chars().count() >= min_length,
            Self::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            Self::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            Self::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Self::Symbol => password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }
}

/// Result of checking a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCheck {
    pub rule: StrengthRule,
    pub satisfied: bool,
}

/// Label shown next to the meter, one per possible score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLabel {
    Critical,
    Weak,
    Fair,
    Good,
    Strong,
    Quantum,
}

impl StrengthLabel {
    const BY_SCORE: [StrengthLabel; 6] = [
        Self::Critical,
        Self::Weak,
        Self::Fair,
        Self::Good,
        Self::Strong,
        Self::Quantum,
    ];

    /// Map a score to its label; scores past the end saturate
    pub fn from_score(score: usize) -> Self {
        Self::BY_SCORE[score.min(Self::BY_SCORE.len() - 1)]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Weak => "WEAK",
            Self::Fair => "FAIR",
            Self::Good => "GOOD",
            Self::Strong => "STRONG",
            Self::Quantum => "QUANTUM",
        }
    }
}

/// Derived strength of one password; never cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthReport {
    pub requirements: Vec<RuleCheck>,
    pub score: usize,
}

impl StrengthReport {
    pub fn label(&self) -> StrengthLabel {
        StrengthLabel::from_score(self.score)
    }

    pub fn is_satisfied(&self, rule: StrengthRule) -> bool {
        self.requirements
            .iter()
            .any(|check| check.rule == rule && check.satisfied)
    }

    pub fn all_satisfied(&self) -> bool {
        self.score == self.requirements.len()
    }

    /// Fill fraction for a meter bar, in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.requirements.is_empty() {
            0.0
        } else {
            self.score as f32 / self.requirements.len() as f32
        }
    }
}

/// Scores passwords against [`StrengthRule::ALL`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthScorer {
    min_length: usize,
}

impl StrengthScorer {
    pub const DEFAULT_MIN_LENGTH: usize = 12;

    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn evaluate(&self, password: &str) -> StrengthReport {
        let requirements: Vec<RuleCheck> = StrengthRule::ALL
            .iter()
            .map(|&rule| RuleCheck {
                rule,
                satisfied: rule.is_satisfied(password, self.min_length),
            })
            .collect();
        let score = requirements.iter().filter(|check| check.satisfied).count();

        StrengthReport {
            requirements,
            score,
        }
    }
}

impl Default for StrengthScorer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LENGTH)
    }
}
