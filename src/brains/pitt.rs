//! Pitt-style rule-set controllers
//!
//! A Pitt genome encodes a whole rule set as one flat real vector. For `I`
//! inputs, `O` outputs and `M` memory registers every rule occupies
//! `2 * (I + M)` condition values, one unordered `(a, b)` interval per
//! input and per register, followed by `O + M` action values: the outputs,
//! then the values written back to the registers. The `M` initial register
//! values follow the last rule.
//!
//! ```text
//! c1 c1' ... cI cI' r1 r1' ... rM rM'  a1 ... aO w1 ... wM   (rule 1)
//! ...                                                        (rule k)
//! m1 ... mM                                                  (initial registers)
//! ```

use serde::{Deserialize, Serialize};

use crate::brains::environment::Brain;
use crate::decoder::Decoder;
use crate::error::{EvoResult, GenomeError, TrialError};
use crate::genome::bounds::{Bounds, MultiBounds};
use crate::genome::traits::RealValuedGenome;

/// How to choose among several matching rules
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityMetric {
    /// The first matching rule in genome order fires
    #[default]
    RuleOrder,
    /// The matching rule with the smallest condition volume fires
    Specificity,
}

/// Shape of a Pitt rule set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PittRulesConfig {
    /// Number of observation values
    pub num_inputs: usize,
    /// Number of action values
    pub num_outputs: usize,
    /// Number of memory registers
    pub num_memory_registers: usize,
    /// Rule selection policy
    pub priority: PriorityMetric,
}

impl Default for PittRulesConfig {
    fn default() -> Self {
        Self {
            num_inputs: 1,
            num_outputs: 1,
            num_memory_registers: 0,
            priority: PriorityMetric::RuleOrder,
        }
    }
}

impl PittRulesConfig {
    /// Create a configuration without memory registers
    pub fn new(num_inputs: usize, num_outputs: usize) -> Self {
        Self {
            num_inputs,
            num_outputs,
            ..Self::default()
        }
    }

    /// Set the number of memory registers
    pub fn with_memory_registers(mut self, count: usize) -> Self {
        self.num_memory_registers = count;
        self
    }

    /// Set the rule selection policy
    pub fn with_priority(mut self, priority: PriorityMetric) -> Self {
        self.priority = priority;
        self
    }

    /// Genes per rule spent on conditions
    pub fn condition_width(&self) -> usize {
        2 * (self.num_inputs + self.num_memory_registers)
    }

    /// Genes per rule spent on actions
    pub fn action_width(&self) -> usize {
        self.num_outputs + self.num_memory_registers
    }

    /// Genes per rule
    pub fn rule_width(&self) -> usize {
        self.condition_width() + self.action_width()
    }

    /// Genome length for `num_rules` rules
    pub fn genome_length(&self, num_rules: usize) -> usize {
        num_rules * self.rule_width() + self.num_memory_registers
    }

    /// Number of rules encoded by a genome of `length` genes
    ///
    /// Fails with [`GenomeError::MalformedGenome`] unless the length is
    /// `k * rule_width + num_memory_registers` for some `k >= 1`.
    pub fn num_rules(&self, length: usize) -> Result<usize, GenomeError> {
        let width = self.rule_width();
        let memory = self.num_memory_registers;
        let malformed = || GenomeError::MalformedGenome {
            expected: format!("k * {} + {} for k >= 1", width, memory),
            actual: length,
        };
        if width == 0 || length < width + memory {
            return Err(malformed());
        }
        let body = length - memory;
        if body % width != 0 {
            return Err(malformed());
        }
        Ok(body / width)
    }

    /// Gene bounds for a genome of `num_rules` rules
    ///
    /// Both ends of each condition interval take the range of the value it
    /// tests; outputs take `output_bounds` and every register value takes
    /// `memory_bounds`.
    pub fn genome_bounds(
        &self,
        num_rules: usize,
        input_bounds: &MultiBounds,
        output_bounds: &MultiBounds,
        memory_bounds: Bounds,
    ) -> EvoResult<MultiBounds> {
        if input_bounds.dimension() != self.num_inputs {
            return Err(GenomeError::DimensionMismatch {
                expected: self.num_inputs,
                actual: input_bounds.dimension(),
            }
            .into());
        }
        if output_bounds.dimension() != self.num_outputs {
            return Err(GenomeError::DimensionMismatch {
                expected: self.num_outputs,
                actual: output_bounds.dimension(),
            }
            .into());
        }

        let registers = vec![memory_bounds; self.num_memory_registers];
        let mut rule = Vec::with_capacity(self.rule_width());
        for b in input_bounds.bounds.iter().chain(&registers) {
            rule.push(*b);
            rule.push(*b);
        }
        rule.extend(output_bounds.bounds.iter().copied());
        rule.extend(registers.iter().copied());

        let mut bounds = MultiBounds::repeat(&rule, num_rules);
        bounds.bounds.extend(registers);
        Ok(bounds)
    }
}

/// One condition-action rule
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Closed interval per input and register, `lo <= hi`
    pub conditions: Vec<Bounds>,
    /// Output values followed by register write-backs
    pub actions: Vec<f64>,
}

impl Rule {
    /// Whether every value lies inside its condition interval
    pub fn matches(&self, state: &[f64]) -> bool {
        self.conditions
            .iter()
            .zip(state)
            .all(|(c, &v)| c.contains(v))
    }

    /// Summed distance from each value to its condition interval
    pub fn distance(&self, state: &[f64]) -> f64 {
        self.conditions
            .iter()
            .zip(state)
            .map(|(c, &v)| {
                if v < c.min {
                    c.min - v
                } else if v > c.max {
                    v - c.max
                } else {
                    0.0
                }
            })
            .sum()
    }

    /// Volume of the condition box; smaller is more specific
    pub fn volume(&self) -> f64 {
        self.conditions.iter().map(Bounds::range).product()
    }
}

/// A decoded rule set with its memory registers
#[derive(Clone, Debug, PartialEq)]
pub struct PittRulesBrain {
    rules: Vec<Rule>,
    initial_registers: Vec<f64>,
    registers: Vec<f64>,
    num_inputs: usize,
    num_outputs: usize,
    priority: PriorityMetric,
}

impl PittRulesBrain {
    /// The rules in genome order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Current register values
    pub fn registers(&self) -> &[f64] {
        &self.registers
    }

    /// Index of the rule that fires for `state` (inputs then registers)
    ///
    /// Ties go to the earlier rule. If no rule matches, the rule closest to
    /// matching fires.
    pub fn select(&self, state: &[f64]) -> usize {
        let matching = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.matches(state));

        let chosen = match self.priority {
            PriorityMetric::RuleOrder => matching.map(|(i, _)| i).next(),
            PriorityMetric::Specificity => {
                argmin(matching.map(|(i, rule)| (i, rule.volume())))
            }
        };

        chosen
            .or_else(|| {
                argmin(
                    self.rules
                        .iter()
                        .enumerate()
                        .map(|(i, rule)| (i, rule.distance(state))),
                )
            })
            .unwrap_or(0)
    }
}

/// Index with the smallest key, keeping the first on ties
fn argmin(items: impl Iterator<Item = (usize, f64)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, key) in items {
        match best {
            Some((_, k)) if key >= k => {}
            _ => best = Some((i, key)),
        }
    }
    best.map(|(i, _)| i)
}

impl Brain for PittRulesBrain {
    fn reset(&mut self) {
        self.registers.clone_from(&self.initial_registers);
    }

    fn act(&mut self, observation: &[f64]) -> Result<Vec<f64>, TrialError> {
        if observation.len() != self.num_inputs {
            return Err(TrialError::Brain(format!(
                "expected {} observation values, got {}",
                self.num_inputs,
                observation.len()
            )));
        }

        let mut state = Vec::with_capacity(observation.len() + self.registers.len());
        state.extend_from_slice(observation);
        state.extend_from_slice(&self.registers);

        let rule = &self.rules[self.select(&state)];
        let (outputs, write_back) = rule.actions.split_at(self.num_outputs);
        self.registers.copy_from_slice(write_back);
        Ok(outputs.to_vec())
    }
}

/// Decodes flat real vectors into [`PittRulesBrain`]s
#[derive(Clone, Debug, PartialEq)]
pub struct PittRulesDecoder {
    config: PittRulesConfig,
}

impl PittRulesDecoder {
    /// Create a decoder for rule sets of the given shape
    ///
    /// # Panics
    /// Panics if rules would have no action values
    pub fn new(config: PittRulesConfig) -> Self {
        assert!(
            config.action_width() > 0,
            "Pitt rules need at least one output or memory register"
        );
        Self { config }
    }

    /// The rule-set shape
    pub fn config(&self) -> &PittRulesConfig {
        &self.config
    }
}

impl<G: RealValuedGenome> Decoder<G> for PittRulesDecoder {
    type Phenotype = PittRulesBrain;

    fn decode(&self, genome: &G) -> Result<PittRulesBrain, GenomeError> {
        let genes = genome.genes();
        let num_rules = self.config.num_rules(genes.len())?;
        let width = self.config.rule_width();
        let condition_width = self.config.condition_width();
        let (body, registers) = genes.split_at(num_rules * width);

        let rules = body
            .chunks_exact(width)
            .map(|chunk| {
                let (conditions, actions) = chunk.split_at(condition_width);
                Rule {
                    conditions: conditions
                        .chunks_exact(2)
                        .map(|pair| Bounds {
                            min: pair[0].min(pair[1]),
                            max: pair[0].max(pair[1]),
                        })
                        .collect(),
                    actions: actions.to_vec(),
                }
            })
            .collect();

        Ok(PittRulesBrain {
            rules,
            initial_registers: registers.to_vec(),
            registers: registers.to_vec(),
            num_inputs: self.config.num_inputs,
            num_outputs: self.config.num_outputs,
            priority: self.config.priority,
        })
    }
}
