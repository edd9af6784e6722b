use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table};
use inquire::{Select, Text};
use serde::Serialize;
use std::path::PathBuf;

use mirai_navi_order::config::{self, Catalog};
use mirai_navi_order::form::{self, CouponKind, FormInput};
use mirai_navi_order::handoff::{self, SystemClipboard};
use mirai_navi_order::summary::charges_table;
use mirai_navi_order::{
    Charges, FieldId, FormState, OrderError, ValidationResult, compute_charges, format_yen,
    init_tracing, render_summary, validate,
};

// ==========================================
// Constants
// ==========================================
const COPY_ONLY_OPT: &str = "📋 Copy to clipboard";
const COPY_AND_OPEN_OPT: &str = "💬 Copy and open LINE";

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "mirai-navi-order", version, about = "Mirai Navi reservation order form")]
struct Cli {
    /// Catalog file (defaults to the config dir, created on first run)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the order form interactively
    New,
    /// Price an order from flags without prompting
    Quote(QuoteArgs),
    /// List plans and payment methods
    Plans,
    /// Write the default catalog (if missing) and show its path
    Config,
}

#[derive(Args)]
struct QuoteArgs {
    /// Requester name
    #[arg(long, default_value = "")]
    name: String,
    /// Plan id from the catalog
    #[arg(long)]
    plan: Option<String>,
    /// Agree to the light discount
    #[arg(long)]
    light: bool,
    /// Coupon status
    #[arg(long, value_enum)]
    coupon: Option<CouponKind>,
    /// Percentage for a percent coupon, as typed
    #[arg(long)]
    percent: Option<String>,
    /// Payment method value or label
    #[arg(long)]
    payment: Option<String>,
    /// Free-text remarks
    #[arg(long, default_value = "")]
    remarks: String,
    /// Confirm all agreement items
    #[arg(long)]
    agree: bool,
    /// Validate and print the shareable summary
    #[arg(long)]
    summary: bool,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl From<QuoteArgs> for FormInput {
    fn from(args: QuoteArgs) -> Self {
        FormInput {
            requester_name: args.name,
            plan: args.plan,
            light_discount: args.light,
            coupon: args.coupon,
            percent: args.percent,
            payment_method: args.payment,
            remarks: args.remarks,
            agreed: args.agree,
        }
    }
}

#[derive(Serialize)]
struct QuoteReport<'a> {
    charges: &'a Charges,
    validation: &'a ValidationResult,
    summary: Option<String>,
}

// ==========================================
// Main Function
// ==========================================

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let catalog_path = cli
        .catalog
        .as_deref()
        .map(config::expand_home_dir)
        .unwrap_or_else(config::default_catalog_path);

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Config = command {
        if config::init_catalog(&catalog_path)? {
            println!("✨ Wrote default catalog.");
        }
        println!("📂 Catalog: {}", catalog_path.display());
        return Ok(());
    }

    let catalog = config::load_or_init_catalog(&catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;

    match command {
        Commands::New => run_interactive(&catalog),
        Commands::Quote(args) => run_quote(&catalog, args),
        Commands::Plans => {
            list_catalog(&catalog);
            Ok(())
        }
        Commands::Config => Ok(()),
    }
}

// ==========================================
// 1. Interactive Form
// ==========================================

fn run_interactive(catalog: &Catalog) -> Result<()> {
    let state = match form::prompt_form(catalog) {
        Ok(state) => state,
        Err(e) if e.is_cancelled() => {
            println!("Cancelled");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let charges = compute_charges(&state);
    println!("\n--- Your Order ---");
    println!("{}", charges_table(&charges));

    let result = validate(&state);
    if !result.is_valid() {
        print_validation(&result);
        return Ok(());
    }

    let text = summary_text(&state, &charges)?;
    println!("\n{text}\n");

    let link = match &catalog.messaging.url {
        Some(url) => {
            let choice = match Select::new("Send:", vec![COPY_ONLY_OPT, COPY_AND_OPEN_OPT])
                .prompt()
                .map_err(OrderError::from)
            {
                Ok(choice) => choice,
                Err(e) if e.is_cancelled() => {
                    println!("Cancelled");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            (choice == COPY_AND_OPEN_OPT).then_some(url.as_str())
        }
        None => None,
    };

    let mut clipboard = SystemClipboard::default();
    let outcome = handoff::hand_off(&mut clipboard, &text, link, handoff::open_link);
    if outcome.copied {
        println!("✅ {}", outcome.message);
    } else {
        println!("❌ {}", outcome.message);
    }
    if let Some(url) = link {
        if outcome.copied && !outcome.link_opened {
            println!("🔗 Open this link to continue: {url}");
        }
    }
    if outcome.copied && handoff::clipboard_owned_by_process() && clipboard.holds_contents() {
        // The copied text is gone once this process exits
        let waited = Text::new("Press Enter once the summary is pasted:").prompt();
        if let Err(e) = waited.map_err(OrderError::from) {
            if !e.is_cancelled() {
                return Err(e.into());
            }
        }
    }
    Ok(())
}

// ==========================================
// 2. Quote
// ==========================================

fn run_quote(catalog: &Catalog, args: QuoteArgs) -> Result<()> {
    let want_summary = args.summary;
    let as_json = args.json;

    let state = form::build_state(catalog, &FormInput::from(args))?;
    let charges = compute_charges(&state);
    let result = validate(&state);

    let summary = if want_summary && result.is_valid() {
        Some(summary_text(&state, &charges)?)
    } else {
        None
    };

    if as_json {
        let report = QuoteReport {
            charges: &charges,
            validation: &result,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", charges_table(&charges));
    if want_summary {
        match summary {
            Some(text) => println!("\n{text}"),
            None => {
                print_validation(&result);
                if let Some(err) = result.first_error() {
                    bail!("order form is incomplete: {}", err.message);
                }
            }
        }
    }
    Ok(())
}

// ==========================================
// 3. Catalog Listing
// ==========================================

fn list_catalog(catalog: &Catalog) {
    let mut plans = Table::new();
    plans.set_header(vec![
        Cell::new("Id"),
        Cell::new("Plan"),
        Cell::new("Price"),
        Cell::new("Light discount"),
    ]);
    for plan in &catalog.plans {
        let id = if catalog.default_plan.as_deref() == Some(plan.id.as_str()) {
            format!("{} (default)", plan.id)
        } else {
            plan.id.clone()
        };
        plans.add_row(vec![
            Cell::new(id),
            Cell::new(&plan.label),
            Cell::new(format_yen(plan.base_price)).set_alignment(CellAlignment::Right),
            Cell::new(format_yen(plan.light_discount_price)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("--- Plans ---");
    println!("{plans}");

    let mut methods = Table::new();
    methods.set_header(vec![Cell::new("Value"), Cell::new("Payment method")]);
    for method in &catalog.payment_methods {
        methods.add_row(vec![Cell::new(&method.value), Cell::new(&method.label)]);
    }
    println!("\n--- Payment Methods ---");
    println!("{methods}");
}

// ==========================================
// 4. Helpers
// ==========================================

fn summary_text(state: &FormState, charges: &Charges) -> Result<String> {
    let payment = state.payment_method.as_ref().map(|m| m.label.as_str());
    Ok(render_summary(&charges.items, charges.total, payment, &state.remarks)?)
}

fn print_validation(result: &ValidationResult) {
    println!("\n--- Please check the form ---");
    for field in FieldId::ALL {
        if result.is_highlighted(field) {
            println!("  ⚠️  {field}");
        }
    }
    if let Some(err) = result.first_error() {
        println!("❌ {}", err.message);
    }
}
