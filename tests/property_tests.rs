//! Property-based tests for leap-evo
//!
//! Uses proptest to verify invariants of the operators and the engine.

use leap_evo::prelude::*;
use proptest::prelude::*;

fn ctx(seed: u64) -> PipelineContext {
    PipelineContext::new(seed, Direction::Maximize, EvaluationBudget::unlimited())
}

fn evaluated(genomes: Vec<Vec<f64>>) -> Population<RealVector> {
    genomes
        .into_iter()
        .enumerate()
        .map(|(i, genes)| Individual::with_fitness(RealVector::new(genes), i as f64))
        .collect()
}

proptest! {
    // ==================== Decoder Properties ====================

    #[test]
    fn pitt_decode_is_deterministic(
        num_rules in 1usize..5,
        seed in any::<u64>()
    ) {
        let config = PittRulesConfig::new(2, 1);
        let length = config.genome_length(num_rules);
        let bounds = MultiBounds::symmetric(3.0, length);
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(seed);
        let genome: RealVector = UniformRealInitializer::new(bounds).initialize(&mut rng);

        let decoder = PittRulesDecoder::new(config);
        let first = decoder.decode(&genome).unwrap();
        let second = decoder.decode(&genome).unwrap();
        prop_assert_eq!(first.rules().len(), num_rules);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn pitt_rejects_partial_rules(extra in 1usize..5) {
        let config = PittRulesConfig::new(2, 1);
        let genome = RealVector::zeros(config.genome_length(1) + extra);
        let result = PittRulesDecoder::new(config).decode(&genome);
        let is_malformed = matches!(result, Err(GenomeError::MalformedGenome { .. }));
        prop_assert!(is_malformed);
    }

    // ==================== Operator Properties ====================

    #[test]
    fn gaussian_mutation_respects_hard_bounds(
        genomes in prop::collection::vec(prop::collection::vec(-1.0..=1.0f64, 4), 1..10),
        sigma in 0.01f64..10.0,
        seed in any::<u64>()
    ) {
        let mut mutation = GaussianMutation::new(1.0, sigma).with_hard_bounds((-1.0, 1.0));
        let out = mutation.apply(evaluated(genomes), &mut ctx(seed)).unwrap();

        for individual in out.iter() {
            prop_assert!(!individual.is_evaluated());
            for gene in individual.genome().genes() {
                prop_assert!((-1.0..=1.0).contains(gene));
            }
        }
    }

    #[test]
    fn gaussian_hard_bounds_pull_back_unmutated_genes(
        genomes in prop::collection::vec(prop::collection::vec(-10.0..10.0f64, 6), 1..10),
        probability in 0.0f64..0.9,
        seed in any::<u64>()
    ) {
        let mut mutation = GaussianMutation::new(probability, 0.5).with_hard_bounds((-1.0, 1.0));
        let out = mutation.apply(evaluated(genomes), &mut ctx(seed)).unwrap();

        for individual in out.iter() {
            for gene in individual.genome().genes() {
                prop_assert!((-1.0..=1.0).contains(gene));
            }
        }
    }

    #[test]
    fn clones_never_alias_parents(
        genomes in prop::collection::vec(prop::collection::vec(-5.0..5.0f64, 3), 1..10)
    ) {
        let parents = evaluated(genomes);
        let mut clones = Cloning::new().apply(parents.clone(), &mut ctx(0)).unwrap();
        prop_assert_eq!(clones.len(), parents.len());

        for clone in clones.iter_mut() {
            clone.genome_mut().genes_mut()[0] += 100.0;
        }
        for (parent, clone) in parents.iter().zip(clones.iter()) {
            prop_assert!(parent.genome()[0] < 5.0);
            prop_assert!(!parent.shares_genome_with(clone));
        }
    }

    #[test]
    fn tournament_returns_requested_count(
        size in 1usize..20,
        n in 0usize..40,
        seed in any::<u64>()
    ) {
        let genomes = (0..size).map(|i| vec![i as f64]).collect();
        let population = evaluated(genomes);
        let selected = TournamentSelection::new(n)
            .apply(population.clone(), &mut ctx(seed))
            .unwrap();

        prop_assert_eq!(selected.len(), n);
        for individual in selected.iter() {
            prop_assert!(population.iter().any(|p| p.shares_genome_with(individual)));
        }
    }

    // ==================== Engine Properties ====================

    #[test]
    fn evaluation_budget_is_never_exceeded(
        budget in 10usize..200,
        population_size in 1usize..10,
        seed in any::<u64>()
    ) {
        let engine = EngineBuilder::<RealVector, RealVector, _, _>::new()
            .population_size(population_size)
            .max_evaluations(budget)
            .seed(seed)
            .initializer(UniformRealInitializer::new(MultiBounds::symmetric(5.0, 3)))
            .decoder(IdentityDecoder)
            .problem(Sphere)
            .stage(TournamentSelection::new(population_size))
            .stage(Cloning::new())
            .stage(GaussianMutation::new(0.5, 0.1))
            .build()
            .unwrap();

        let mut last = 0;
        for generation in engine {
            let generation = generation.unwrap();
            prop_assert!(generation.evaluations <= budget);
            prop_assert!(generation.evaluations > last);
            last = generation.evaluations;
        }
        // Generation k costs (k + 1) * population_size evaluations in total
        let whole = budget / population_size;
        let expected = if whole >= 2 { whole * population_size } else { 0 };
        prop_assert_eq!(last, expected);
    }
}
