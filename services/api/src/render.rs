use clap::Args;
use quickliqi::error::AppError;
use quickliqi::workflows::candidates::{
    CandidateCsvImporter, CandidateFilters, CandidateImport, FieldMapping,
};
use quickliqi::workflows::deals::validation::{validate_input, validate_settings};
use quickliqi::workflows::deals::{
    evaluate_detailed, DealEvaluation, DealInput, FinancingPref, PropertyType, Settings,
    SettingsUpdate,
};
use std::path::PathBuf;

pub(crate) fn parse_financing(raw: &str) -> Result<FinancingPref, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "cash" => Ok(FinancingPref::Cash),
        "creative" => Ok(FinancingPref::Creative),
        "any" => Ok(FinancingPref::Any),
        other => Err(format!("unknown financing preference '{other}' (cash, creative, any)")),
    }
}

pub(crate) fn parse_property_type(raw: &str) -> Result<PropertyType, String> {
    PropertyType::from_label(raw).ok_or_else(|| format!("unknown property type '{raw}'"))
}

#[derive(Args, Debug)]
pub(crate) struct DealEvaluationArgs {
    /// Asking price
    #[arg(long)]
    pub(crate) list_price: f64,
    /// After-repair value (defaults to 1.3 x list price)
    #[arg(long)]
    pub(crate) arv: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) repairs: f64,
    /// Gross monthly rent
    #[arg(long, default_value_t = 0.0)]
    pub(crate) rent: f64,
    /// Monthly taxes plus insurance
    #[arg(long, default_value_t = 0.0)]
    pub(crate) taxes_insurance: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) assignment_fee: f64,
    /// cash, creative, or any
    #[arg(long, default_value = "any", value_parser = parse_financing)]
    pub(crate) financing: FinancingPref,
    #[arg(long, default_value_t = 0)]
    pub(crate) days_on_market: u32,
    #[arg(long)]
    pub(crate) sqft: Option<f64>,
    #[arg(long, default_value = "SFR", value_parser = parse_property_type)]
    pub(crate) property_type: PropertyType,
    #[arg(long, default_value_t = 0)]
    pub(crate) beds: u32,
    /// Override the minimum cash-on-cash return (percent)
    #[arg(long)]
    pub(crate) min_coc_pct: Option<f64>,
    #[arg(long)]
    pub(crate) min_dscr: Option<f64>,
    #[arg(long)]
    pub(crate) min_monthly_cf: Option<f64>,
    #[arg(long)]
    pub(crate) max_rehab: Option<f64>,
    /// Override the maximum seller-finance down payment (fraction)
    #[arg(long)]
    pub(crate) max_down_payment_pct: Option<f64>,
    /// Override the maximum seller-finance rate (percent)
    #[arg(long)]
    pub(crate) max_interest_rate: Option<f64>,
    #[arg(long)]
    pub(crate) term_years: Option<u32>,
    /// Emit the full evaluation as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl DealEvaluationArgs {
    fn input(&self) -> DealInput {
        DealInput {
            list_price: self.list_price,
            arv_estimate: self.arv,
            repair_estimate: self.repairs,
            monthly_rent: self.rent,
            taxes_insurance_monthly: self.taxes_insurance,
            assignment_fee: self.assignment_fee,
            financing_pref: self.financing,
            days_on_market: self.days_on_market,
            sqft: self.sqft,
            property_type: self.property_type,
            beds: self.beds,
        }
    }

    fn settings_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            min_coc_pct: self.min_coc_pct,
            min_dscr: self.min_dscr,
            min_monthly_cf: self.min_monthly_cf,
            max_rehab: self.max_rehab,
            max_down_payment_pct: self.max_down_payment_pct,
            max_interest_rate: self.max_interest_rate,
            term_years: self.term_years,
            ..SettingsUpdate::default()
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct CandidateImportArgs {
    /// Listing spreadsheet to import
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[arg(long, default_value_t = 100)]
    pub(crate) dom_min: u32,
    #[arg(long, default_value_t = 1_000_000.0)]
    pub(crate) price_max: f64,
    #[arg(long, default_value_t = 1)]
    pub(crate) beds_min: u32,
}

pub(crate) fn run_deal_evaluation(args: DealEvaluationArgs) -> Result<(), AppError> {
    let settings = args.settings_update().apply(&Settings::default());
    validate_settings(&settings)?;
    let input = args.input();
    validate_input(&input)?;

    let evaluation = evaluate_detailed(&input, &settings);
    if args.json {
        match serde_json::to_string_pretty(&evaluation) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Evaluation payload unavailable: {err}"),
        }
    } else {
        render_deal_evaluation(&evaluation);
    }
    Ok(())
}

pub(crate) fn run_candidate_import(args: CandidateImportArgs) -> Result<(), AppError> {
    let filters = CandidateFilters {
        dom_min: args.dom_min,
        price_max: args.price_max,
        beds_min: args.beds_min,
    };
    let import = CandidateCsvImporter::new(FieldMapping::default(), filters).import_path(&args.csv)?;
    render_candidate_import(&import);
    Ok(())
}

pub(crate) fn render_deal_evaluation(evaluation: &DealEvaluation) {
    let metrics = &evaluation.metrics;
    println!("Deal evaluation");
    println!(
        "- Signal {} via {} scenario (ARV ${:.0})",
        metrics.deal_signal.label(),
        evaluation.scenario.label(),
        evaluation.arv
    );
    println!(
        "- NOI ${}/mo | debt service ${}/mo | cash flow ${}/mo",
        metrics.noi_monthly, metrics.debt_service_monthly, metrics.cash_flow_monthly
    );
    println!("- CoC {:.1}% | DSCR {:.2}", metrics.coc_pct, metrics.dscr);
    println!(
        "- MAO cash ${} | MAO creative ${}",
        metrics.mao_cash, metrics.mao_creative
    );

    println!("\nScenarios");
    for (label, figures) in [("Cash", &evaluation.cash), ("Creative", &evaluation.creative)] {
        println!(
            "  - {}: offer ${:.0} | cash in ${:.0} | CF ${:.0}/mo | CoC {:.1}% | DSCR {:.2}",
            label,
            figures.max_offer,
            figures.total_cash_in,
            figures.cash_flow_monthly,
            figures.coc_pct,
            figures.dscr
        );
    }

    if evaluation.shortfalls.is_empty() {
        println!("\nCriteria shortfalls: none");
    } else {
        println!("\nCriteria shortfalls");
        for shortfall in &evaluation.shortfalls {
            println!("  - {}", shortfall.summary());
        }
    }

    println!("\nNotes: {}", metrics.deal_notes);
    println!("Offer: {}", metrics.offer_suggestion);
}

pub(crate) fn render_candidate_import(import: &CandidateImport) {
    println!("Candidate import");
    println!(
        "- {} rows read | {} rejected | {} filtered out | {} returned",
        import.rows_read,
        import.rejected,
        import.filtered_out,
        import.candidates.len()
    );
    if import.candidates.is_empty() {
        println!("\nCandidates: none");
        return;
    }

    println!("\nCandidates");
    for candidate in &import.candidates {
        println!(
            "  - [{}] {} {}, {}, {} | ${:.0} | {} DOM | {}",
            candidate.opportunity_score,
            candidate.deal_signal.label(),
            candidate.address,
            candidate.city,
            candidate.state,
            candidate.list_price,
            candidate.days_on_market,
            candidate.offer_suggestion
        );
    }
}
