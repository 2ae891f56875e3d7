//! Calculation properties and reference scenarios

use compliance::pcaf::{AssetClass, PortfolioAggregator};
use compliance::sbti::SbtiRule;
use compliance::{
    Asset, CompletionRollup, Control, DisclosureItem, DisclosureRecord, MaterialTopic,
    MaterialityClassifier, PortfolioRecord, ProgressEvaluator, Recompute, RecomputeContext,
    RiskScorer, SbtiRecord, TargetRecord, TargetType,
};
use standards::{ControlEffectiveness, Impact, Likelihood, PriorityBucket, StandardsProfile};

fn make_item(id: &str, completed: bool) -> DisclosureItem {
    DisclosureItem {
        id: id.to_string(),
        content: String::new(),
        completed,
    }
}

fn make_asset(id: &str, class: AssetClass, sector: &str, outstanding: f64, value: f64, emissions: f64) -> Asset {
    Asset {
        id: id.to_string(),
        name: id.to_string(),
        asset_class: class,
        sector: Some(sector.to_string()),
        geography: Some("EU".to_string()),
        outstanding_amount: outstanding,
        company_value: value,
        borrower_emissions: emissions,
        data_quality_score: 1 + (id.len() % 5) as u8,
        attribution_factor: None,
        attributed_emissions: None,
        attribution_flag: None,
    }
}

#[test]
fn test_completion_scenario() {
    let standards = StandardsProfile::default();
    let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

    let mut record = DisclosureRecord::new("tenant-1", 2024);
    record.push_item("A", make_item("a1", true));
    record.push_item("A", make_item("a2", true));
    record.push_item("B", make_item("b1", false));
    record.recompute(&ctx).unwrap();

    assert_eq!(record.completion_status.overall, 67);
    assert_eq!(record.completion_status.by_module["A"], 100);
    assert_eq!(record.completion_status.by_module["B"], 0);
}

#[test]
fn test_completion_bounds() {
    let standards = StandardsProfile::default();
    let rollup = CompletionRollup::new(&standards.disclosure);

    for total in 0..12usize {
        for done in 0..=total {
            let mut record = DisclosureRecord::new("tenant-1", 2024);
            for i in 0..total {
                record.push_item("environmental.climateChange", make_item(&i.to_string(), i < done));
            }
            let status = rollup.rollup(&record.modules);

            assert!(status.overall <= 100);
            if total == 0 {
                assert_eq!(status.overall, 0);
            } else if done == total {
                assert_eq!(status.overall, 100);
            }
        }
    }
}

#[test]
fn test_materiality_partition() {
    let standards = StandardsProfile::default();
    let classifier = MaterialityClassifier::new(&standards.materiality);

    let mut topics = Vec::new();
    for impact in 1..=10 {
        for financial in 1..=10 {
            let material = (impact + financial) % 3 != 0;
            let mut topic = MaterialTopic::new("topic", impact as f64, financial as f64, material);
            topic.id = format!("{}-{}", impact, financial);
            topics.push(topic);
        }
    }

    let (matrix, _) = classifier.classify(&topics).unwrap();

    let material: Vec<_> = topics.iter().filter(|t| t.is_material).collect();
    assert_eq!(matrix.len(), material.len());
    for topic in &topics {
        let bucket = matrix.bucket_of(&topic.id);
        assert_eq!(bucket.is_some(), topic.is_material);
        let occurrences = [&matrix.high_priority, &matrix.medium_priority, &matrix.low_priority]
            .iter()
            .filter(|ids| ids.contains(&topic.id))
            .count();
        assert!(occurrences <= 1);
    }

    let climate = MaterialTopic::new("Climate", 8.0, 3.0, true);
    assert_eq!(classifier.classify_topic(&climate).unwrap(), Some(PriorityBucket::High));
}

#[test]
fn test_risk_bounds() {
    let standards = StandardsProfile::default();
    let scorer = RiskScorer::new(&standards.risk.scales, &standards.risk.bands);

    let control_sets: Vec<Vec<Control>> = vec![
        vec![],
        vec![Control::new("none", ControlEffectiveness::NotEffective)],
        vec![Control::new("best", ControlEffectiveness::HighlyEffective)],
        ControlEffectiveness::all()
            .iter()
            .map(|level| Control::new("mixed", *level))
            .collect(),
    ];

    for likelihood in Likelihood::all() {
        for impact in Impact::all() {
            for controls in &control_sets {
                let assessment = scorer.assess(likelihood, impact, controls, None).unwrap();
                assert!((1..=25).contains(&assessment.inherent_risk_score));
                match assessment.residual_risk_score {
                    Some(residual) => {
                        assert!(!controls.is_empty());
                        assert!(residual >= 1 && residual <= assessment.inherent_risk_score);
                    }
                    None => assert!(controls.is_empty()),
                }
            }
        }
    }

    let reference = scorer
        .assess(
            Likelihood::Likely,
            Impact::Major,
            &[Control::new("Hedging", ControlEffectiveness::Effective)],
            None,
        )
        .unwrap();
    assert_eq!(reference.inherent_risk_score, 16);
    assert_eq!(reference.residual_risk_score, Some(6));
}

#[test]
fn test_pcaf_conservation_and_removal() {
    let standards = StandardsProfile::default();
    let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

    let mut portfolio = PortfolioRecord::new("tenant-1", "Mixed book", 2024);
    portfolio.assets = vec![
        make_asset("a", AssetClass::BusinessLoans, "energy", 100.0, 1000.0, 500.0),
        make_asset("bb", AssetClass::Mortgages, "real_estate", 300.0, 400.0, 12.0),
        make_asset("ccc", AssetClass::ProjectFinance, "energy", 80.0, 100.0, 900.0),
        make_asset("dddd", AssetClass::BusinessLoans, "transport", 2000.0, 1000.0, 40.0),
        make_asset("eeeee", AssetClass::SovereignDebt, "public", 10.0, -5.0, 70.0),
    ];
    portfolio.recompute(&ctx).unwrap();

    assert_eq!(portfolio.assets[0].attribution_factor, Some(0.1));
    assert_eq!(portfolio.assets[0].attributed_emissions, Some(50.0));

    while !portfolio.assets.is_empty() {
        let sum: f64 = portfolio
            .assets
            .iter()
            .filter_map(|asset| asset.attributed_emissions)
            .sum();
        assert_eq!(portfolio.totals.total_financed_emissions, sum);
        assert_eq!(portfolio.totals.asset_count, portfolio.assets.len());

        let distributed: usize = portfolio.data_quality_distribution.values().sum();
        assert_eq!(distributed, portfolio.assets.len());

        let before = portfolio.totals.total_financed_emissions;
        portfolio.assets.remove(0);
        portfolio.recompute(&ctx).unwrap();
        assert!(portfolio.totals.total_financed_emissions <= before);
    }

    assert_eq!(portfolio.totals.total_financed_emissions, 0.0);
    assert!(portfolio.breakdown_by_asset_class.is_empty());
    assert!(portfolio.data_quality_distribution.values().all(|count| *count == 0));
}

#[test]
fn test_breakdowns_sum_to_totals() {
    let aggregator = PortfolioAggregator::new("unspecified");
    let mut assets = vec![
        make_asset("a", AssetClass::BusinessLoans, "energy", 100.0, 1000.0, 500.0),
        make_asset("bb", AssetClass::BusinessLoans, "energy", 200.0, 1000.0, 100.0),
    ];
    for asset in &mut assets {
        asset.attributed_emissions = Some(asset.borrower_emissions * asset.outstanding_amount / asset.company_value);
    }

    let aggregate = aggregator.aggregate(&assets);

    let energy = &aggregate.by_sector["energy"];
    assert_eq!(energy.asset_count, 2);
    assert_eq!(energy.emissions, aggregate.totals.total_financed_emissions);
    assert_eq!(energy.exposure, 300.0);
    assert_eq!(aggregate.by_asset_class[&AssetClass::BusinessLoans].asset_count, 2);
}

#[test]
fn test_increase_target_progress_is_monotonic() {
    let standards = StandardsProfile::default();
    let evaluator = ProgressEvaluator::new(&standards.targets);

    let mut target = TargetRecord::new(
        "tenant-1",
        "Renewable share",
        TargetType::Intensity,
        (2020, 20.0),
        (2030, 80.0),
    );

    let mut previous = -1.0;
    for step in 0..=120 {
        target.current_value = Some(step as f64);
        let progress = evaluator.progress(&target).unwrap();
        assert!((0.0..=100.0).contains(&progress));
        assert!(progress >= previous);
        previous = progress;
    }
}

#[test]
fn test_target_status_follows_trajectory_past_deadline() {
    use compliance::TargetStatus;

    let standards = StandardsProfile::default();
    let evaluator = ProgressEvaluator::new(&standards.targets);

    // Reduction goal 1000 -> 0 over 2020..2030, stuck at 60% done.
    let mut target = TargetRecord::new(
        "tenant-1",
        "Scope 2 reduction",
        TargetType::Absolute,
        (2020, 1000.0),
        (2030, 0.0),
    );
    target.current_value = Some(400.0);

    let mut previous = TargetStatus::OnTrack;
    for year in 2020..=2040 {
        let ctx = RecomputeContext::at_year(&standards, year).unwrap();
        target.recompute(&ctx).unwrap();

        let progress = target.progress.unwrap();
        let expected = evaluator.expected_progress(2020, 2030, year);
        assert_eq!(expected, 10.0 * (year - 2020) as f64);

        let status = if progress >= expected - 10.0 {
            TargetStatus::OnTrack
        } else if progress >= expected - 25.0 {
            TargetStatus::AtRisk
        } else {
            TargetStatus::OffTrack
        };
        assert_eq!(target.status, status, "year {}", year);

        // Status only degrades while progress stands still
        let rank = |s: TargetStatus| match s {
            TargetStatus::OnTrack => 0,
            TargetStatus::AtRisk => 1,
            _ => 2,
        };
        assert!(rank(target.status) >= rank(previous));
        previous = target.status;
    }

    assert_eq!(target.status, TargetStatus::OffTrack);
}

#[test]
fn test_sbti_scenario() {
    let standards = StandardsProfile::default();
    let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

    let mut record = SbtiRecord::new("tenant-1");
    record.near_term.base_year = Some(2020);
    record.near_term.target_year = Some(2028);
    record.near_term.scope3.included = false;
    record.scope3_screening.total_scope3 = Some(45.0);

    let validation = record.recompute(&ctx).unwrap();

    assert!(!validation.valid);
    assert!(validation.violates(SbtiRule::Scope3Required));
    assert_eq!(validation.errors.len(), 1);
}
