//! Literal CSV output of the probes

use leap_evo::prelude::*;
use leap_evo::probe::SEPARATOR;

fn ctx() -> PipelineContext {
    PipelineContext::new(0, Direction::Maximize, EvaluationBudget::unlimited())
}

/// Four individuals with fitness 0..4, decorated by `decorate`
fn population(decorate: impl Fn(usize, &mut Attributes)) -> Population<RealVector> {
    (0..4)
        .map(|i| {
            let mut individual = Individual::with_fitness(RealVector::new(vec![i as f64]), i as f64);
            decorate(i, &mut individual.attributes);
            individual
        })
        .collect()
}

fn my_values() -> Vec<AttributeValue> {
    vec!["GREEN".into(), 15.into(), "BLUE".into(), 72.81.into()]
}

fn probe_at_step_10(attributes: &[&str], population: Population<RealVector>) -> String {
    let mut probe = CsvAttributesProbe::new(Vec::new(), attributes.iter().copied());
    Stage::<RealVector>::set_step(&mut probe, 10);
    probe.apply(population, &mut ctx()).unwrap();
    String::from_utf8(probe.into_inner()).unwrap()
}

#[test]
fn test_probe_column_fidelity() {
    let values = my_values();
    let pop = population(|i, attrs| attrs.set("my_value", values[i].clone()));

    assert_eq!(
        probe_at_step_10(&["my_value"], pop),
        "step, my_value\n10, GREEN\n10, 15\n10, BLUE\n10, 72.81\n"
    );
}

#[test]
fn test_probe_column_order_follows_configuration() {
    let foo = my_values();
    let bar = ["Colorless", "green", "ideas", "sleep"];
    let pop = population(|i, attrs| {
        attrs.set("foo", foo[i].clone());
        attrs.set("bar", bar[i]);
    });

    assert_eq!(
        probe_at_step_10(&["bar", "foo"], pop),
        "step, bar, foo\n\
         10, Colorless, GREEN\n\
         10, green, 15\n\
         10, ideas, BLUE\n\
         10, sleep, 72.81\n"
    );
}

#[test]
fn test_list_attribute_renders_literally() {
    let pop = population(|_, attrs| attrs.set("xs", vec![1, 2, 3]));
    let text = probe_at_step_10(&["xs"], pop);

    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row, "10, [1, 2, 3]");
    }
}

#[test]
fn test_probes_inside_an_engine() {
    let mut stats = Vec::new();
    let mut attrs = Vec::new();
    {
        let engine = EngineBuilder::<RealVector, RealVector, _, _>::new()
            .population_size(4)
            .max_generations(3)
            .seed(5)
            .initializer(UniformRealInitializer::new(MultiBounds::symmetric(1.0, 2)))
            .decoder(IdentityDecoder)
            .problem(Sphere)
            .stage(CsvFitnessStatsProbe::new(&mut stats))
            .stage(
                CsvAttributesProbe::new(&mut attrs, Vec::<String>::new())
                    .best_only(true)
                    .with_fitness(true),
            )
            .stage(TournamentSelection::new(4))
            .stage(Cloning::new())
            .stage(GaussianMutation::new(0.5, 0.1))
            .build()
            .unwrap();
        assert_eq!(engine.count(), 3);
    }

    // Probes at the head of the pipeline record each evaluated parent
    // generation, stamped with its index
    let stats = String::from_utf8(stats).unwrap();
    let attrs = String::from_utf8(attrs).unwrap();
    assert_eq!(stats.lines().count(), 4);
    assert!(stats.starts_with("step, bsf, mean_fitness"));
    let steps: Vec<&str> = attrs
        .lines()
        .skip(1)
        .map(|l| l.split(SEPARATOR).next().unwrap())
        .collect();
    assert_eq!(steps, ["0", "1", "2"]);
}
