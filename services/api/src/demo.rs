use std::sync::Arc;

use clap::Args;
use lightcraft::analysis::{AnalysisRequest, SimulatedEstimator, ANALYSIS_SCRIPT, STEP_CADENCE};
use lightcraft::error::AppError;
use lightcraft::quote::{DesignPackage, DesignService};

use crate::infra::InMemoryQuoteRepository;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Street address to analyze. Defaults to the photo-upload flow.
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// Design package to quote after the analysis.
    #[arg(long, default_value = "classic", value_parser = parse_package)]
    pub(crate) design: DesignPackage,
    /// Seed for the simulated estimator, for reproducible output.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Skip the progress-bar cadence and print everything at once.
    #[arg(long)]
    pub(crate) instant: bool,
}

fn parse_package(raw: &str) -> Result<DesignPackage, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "classic" => Ok(DesignPackage::Classic),
        "premium" => Ok(DesignPackage::Premium),
        "custom" => Ok(DesignPackage::Custom),
        other => Err(format!(
            "unknown design package '{other}' (expected classic, premium, or custom)"
        )),
    }
}

fn package_label(package: DesignPackage) -> &'static str {
    match package {
        DesignPackage::Classic => "classic",
        DesignPackage::Premium => "premium",
        DesignPackage::Custom => "custom",
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        address,
        design,
        seed,
        instant,
    } = args;

    let estimator = match seed {
        Some(seed) => SimulatedEstimator::with_seed(seed),
        None => SimulatedEstimator::new(),
    };
    let service = Arc::new(DesignService::new(
        Arc::new(estimator),
        Arc::new(InMemoryQuoteRepository::default()),
    ));

    let request = AnalysisRequest { address };
    let label = request.source_label();
    println!("LightCraft property analysis demo ({label})");

    for step in ANALYSIS_SCRIPT {
        if !instant {
            tokio::time::sleep(STEP_CADENCE).await;
        }
        println!("  [{:>3}%] {}", step.progress, step.message);
    }

    let run = service.analyze(&request);
    let analysis = &run.analysis;

    println!("\nFront facade measurements");
    println!("  roofline:        {} ft", analysis.roofline_length);
    println!("  porch:           {} ft", analysis.porch_length);
    println!("  windows:         {}", analysis.window_count);
    println!("  garage doors:    {}", analysis.garage_door_count);
    println!("  entry features:  {}", analysis.entry_feature_count);
    println!(
        "  local rate:      ${}/ft ({:?} income area)",
        analysis.price_per_foot, analysis.income_level
    );
    println!(
        "  difficulty:      {:?}, est. {} install hours",
        analysis.difficulty, analysis.estimated_install_hours
    );

    println!("\nPackage pricing");
    for package in DesignPackage::ALL {
        println!(
            "  {:<8} ${}",
            package_label(package),
            package.price(analysis)
        );
    }

    let quote = service.generate_quote(design, run.analysis.clone(), label)?;

    println!(
        "\nGenerated quote {} for the {} package: ${} ({})",
        quote.id,
        package_label(quote.design_type),
        quote.total_price,
        quote.date
    );

    println!("\nRecommendations");
    for recommendation in &quote.analysis.recommendations {
        println!("  - {recommendation}");
    }

    Ok(())
}
