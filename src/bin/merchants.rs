//! CLI front end for the merchant dashboard.

use std::io::{self, BufRead as _, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use merchant_dashboard::client::MerchantApiClient;
use merchant_dashboard::config::Settings;
use merchant_dashboard::details::MerchantDetails;
use merchant_dashboard::feed::{FeedRow, TransactionFeed};
use merchant_dashboard::form::{FieldErrors, FormField, MerchantForm};
use merchant_dashboard::format::CurrencyFormatter;
use merchant_dashboard::list::MerchantList;
use merchant_dashboard::models::{
    Merchant, MerchantId, MerchantStatus, MerchantTransactions, NaiveDate, SortDirection,
    SortField, TransactionStatus, Utc,
};
use merchant_dashboard::page::{FormSubmission, MerchantsPage, Notification, NotificationKind};
use merchant_dashboard::query::TransactionQuery;
use merchant_dashboard::store::{MerchantStore, TransactionStore};
use owo_colors::OwoColorize;

/// Merchant dashboard CLI: browse, edit and export merchants and their
/// transactions.
#[derive(Debug, Parser)]
#[command(name = "merchants", version, about)]
struct Cli {
    /// Override the API base URL (default: $MERCHANT_API_BASE_URL).
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// List merchants with search, status filter, sorting and paging.
    List(ListArgs),
    /// Show a merchant's profile, transaction summary and activity.
    Show {
        /// Merchant ID.
        id: String,
    },
    /// Create a merchant.
    Create(MerchantFields),
    /// Update a merchant after confirmation.
    Update {
        /// Merchant ID.
        id: String,
        /// Fields to change.
        #[command(flatten)]
        fields: MerchantFields,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Delete a merchant after confirmation.
    Delete {
        /// Merchant ID.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Show the transaction dashboard for a merchant.
    Transactions(TransactionArgs),
    /// Export one page of a merchant's transactions to CSV.
    Export {
        /// Merchant ID.
        id: String,
        /// Zero-based transaction page.
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Output directory.
        #[arg(long, default_value = ".", value_name = "DIR")]
        dir: PathBuf,
    },
    /// Poll a merchant's transactions and print them as they change.
    Watch(WatchArgs),
}

/// Arguments for the `list` subcommand.
#[derive(Debug, Args)]
struct ListArgs {
    /// One-based page.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Rows per page.
    #[arg(long, default_value_t = merchant_dashboard::list::DEFAULT_PAGE_SIZE)]
    size: u32,
    /// Free-text search on name, email or ID.
    #[arg(long)]
    search: Option<String>,
    /// Only merchants with this status.
    #[arg(long, value_parser = parse_status)]
    status: Option<MerchantStatus>,
    /// Sort column: name, email, status, createdAt, updatedAt.
    #[arg(long, default_value = "name", value_parser = parse_sort_field)]
    sort: SortField,
    /// Sort descending.
    #[arg(long)]
    desc: bool,
    /// Fetch every page instead of one.
    #[arg(long, conflicts_with_all = ["page", "search", "status"])]
    all: bool,
}

/// Editable merchant fields.
#[derive(Debug, Default, Args)]
struct MerchantFields {
    /// Contact name.
    #[arg(long)]
    name: Option<String>,
    /// Contact email.
    #[arg(long)]
    email: Option<String>,
    /// Contact phone.
    #[arg(long)]
    phone: Option<String>,
    /// Business name.
    #[arg(long)]
    business_name: Option<String>,
    /// Registration number.
    #[arg(long)]
    registration_number: Option<String>,
    /// Street address.
    #[arg(long)]
    address: Option<String>,
    /// City.
    #[arg(long)]
    city: Option<String>,
    /// Country.
    #[arg(long)]
    country: Option<String>,
    /// Lifecycle status.
    #[arg(long, value_parser = parse_status)]
    status: Option<MerchantStatus>,
}

impl MerchantFields {
    /// Copies the given fields into a form.
    fn apply(self, form: &mut MerchantForm) {
        let fields = [
            (FormField::Name, self.name),
            (FormField::Email, self.email),
            (FormField::Phone, self.phone),
            (FormField::BusinessName, self.business_name),
            (FormField::RegistrationNumber, self.registration_number),
            (FormField::Address, self.address),
            (FormField::City, self.city),
            (FormField::Country, self.country),
        ];
        for (field, value) in fields {
            if let Some(text) = value {
                form.set_field(field, text);
            }
        }
        if let Some(status) = self.status {
            form.set_status(status);
        }
    }
}

/// Arguments for the `transactions` subcommand.
#[derive(Debug, Args)]
struct TransactionArgs {
    /// Merchant ID (default: $DEFAULT_MERCHANT_ID).
    #[arg(long)]
    merchant: Option<String>,
    /// Zero-based page.
    #[arg(long, default_value_t = 0)]
    page: u32,
    /// Rows per page.
    #[arg(long, default_value_t = merchant_dashboard::query::DEFAULT_TRANSACTION_PAGE_SIZE)]
    size: u32,
    /// Start date (inclusive, YYYY-MM-DD). Requires --to.
    #[arg(long, requires = "to", value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD). Requires --from.
    #[arg(long, requires = "from", value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// Only transactions with this status.
    #[arg(long, value_parser = parse_txn_status)]
    status: Option<TransactionStatus>,
}

/// Arguments for the `watch` subcommand.
#[derive(Debug, Args)]
struct WatchArgs {
    /// Merchant ID (default: $DEFAULT_MERCHANT_ID).
    #[arg(long)]
    merchant: Option<String>,
    /// Seconds between polls.
    #[arg(long, default_value_t = 5)]
    interval: u64,
    /// Client-side search on ID, status, card, acquirer or issuer.
    #[arg(long)]
    search: Option<String>,
    /// Stop after this many polls.
    #[arg(long)]
    polls: Option<u64>,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a merchant status for clap.
fn parse_status(s: &str) -> Result<MerchantStatus, String> {
    s.parse().map_err(|err| format!("{err}"))
}

/// Parses a transaction status for clap.
fn parse_txn_status(s: &str) -> Result<TransactionStatus, String> {
    s.parse().map_err(|err| format!("{err}"))
}

/// Parses a sort column for clap.
fn parse_sort_field(s: &str) -> Result<SortField, String> {
    s.parse().map_err(|err| format!("{err}"))
}

/// Prints an error line to stderr.
fn report<T: core::fmt::Display>(message: T) -> io::Result<()> {
    writeln!(io::stderr().lock(), "{} {message}", "error:".red().bold())
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let settings = match Settings::from_env()
        .and_then(|settings| match cli.base_url.as_deref() {
            Some(url) => settings.with_base_url(url),
            None => Ok(settings),
        }) {
        Ok(settings) => settings,
        Err(err) => {
            report(&err)?;
            writeln!(
                io::stderr().lock(),
                "  {} set {} in the environment or a .env file",
                "hint:".cyan(),
                merchant_dashboard::config::API_BASE_URL_ENV
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = match MerchantApiClient::builder()
        .base_url(settings.api_base_url.as_str())
        .timeout(settings.request_timeout)
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            report(format_args!("failed to build client: {err}"))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(client, &settings, cli.command))
}

/// Dispatches to the appropriate subcommand handler.
async fn dispatch(
    client: MerchantApiClient,
    settings: &Settings,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::List(args) => cmd_list(&client, args).await,
        Command::Show { id } => cmd_show(&client, MerchantId::new(id)).await,
        Command::Create(fields) => cmd_create(&client, fields).await,
        Command::Update { id, fields, yes } => {
            cmd_update(&client, MerchantId::new(id), fields, yes).await
        }
        Command::Delete { id, yes } => cmd_delete(&client, MerchantId::new(id), yes).await,
        Command::Transactions(args) => cmd_transactions(&client, settings, args).await,
        Command::Export { id, page, dir } => {
            cmd_export(&client, MerchantId::new(id), page, &dir).await
        }
        Command::Watch(args) => cmd_watch(client, settings, args).await,
    }
}

/// Executes the `list` subcommand.
async fn cmd_list(client: &MerchantApiClient, args: ListArgs) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading merchants...");

    if args.all {
        let mut store = MerchantStore::new();
        let outcome = store.fetch_all_merchants(client).await;
        spinner.finish_and_clear();
        return match outcome {
            Ok(()) => {
                print_merchants_table(store.merchants())?;
                Ok(ExitCode::SUCCESS)
            }
            Err(_) => {
                report(store.error().unwrap_or("failed to load merchants"))?;
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let mut list = MerchantList::new();
    list.set_page_size(args.size);
    list.set_sort(
        args.sort,
        if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    );
    list.set_status_filter(args.status);
    if let Some(text) = args.search {
        list.set_search_input(text, tokio::time::Instant::now());
        let _applied = list.wait_for_search().await;
    }

    list.start_at_page(args.page);
    let _fetched = list.sync(client).await;
    if list.error().is_none() && list.merchants().is_empty() && args.page > 1 {
        // Past the end: learn the real page count, then show the last page.
        list.first_page();
        let _fetched = list.sync(client).await;
        list.go_to_page(args.page);
        let _fetched = list.sync(client).await;
    }
    spinner.finish_and_clear();

    if let Some(error) = list.error() {
        report(error)?;
        return Ok(ExitCode::FAILURE);
    }

    print_merchants_table(list.merchants())?;
    let mut out = io::stdout().lock();
    if let Some(line) = list.summary_line() {
        writeln!(out, "{}", line.dimmed())?;
    }
    let (field, direction) = list.sort();
    let arrow = list.sort_indicator(field).unwrap_or_default();
    writeln!(
        out,
        "{}",
        format_args!(
            "sorted by {field} {arrow} ({})",
            match direction {
                SortDirection::Asc => "ascending",
                SortDirection::Desc => "descending",
            }
        )
        .dimmed()
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `show` subcommand.
async fn cmd_show(client: &MerchantApiClient, id: MerchantId) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading merchant...");
    let mut store = MerchantStore::new();
    let Ok(merchant) = store.fetch_merchant(client, &id).await else {
        spinner.finish_and_clear();
        report(store.error().unwrap_or("failed to load merchant"))?;
        return Ok(ExitCode::FAILURE);
    };

    let mut page = MerchantsPage::new();
    page.view_and_load(merchant, client).await;
    spinner.finish_and_clear();
    let Some(details) = page.details_mut() else {
        return Ok(ExitCode::FAILURE);
    };
    print_details(details)?;
    page.close_details();
    Ok(ExitCode::SUCCESS)
}

/// Executes the `create` subcommand.
async fn cmd_create(client: &MerchantApiClient, fields: MerchantFields) -> io::Result<ExitCode> {
    let mut page = MerchantsPage::new();
    page.open_create();
    if let Some(form) = page.form_mut() {
        fields.apply(form);
    }

    let spinner = make_spinner("Creating merchant...");
    let submission = page.submit_form(client).await;
    spinner.finish_and_clear();

    match submission {
        FormSubmission::Created => {
            print_notification(page.notification())?;
            Ok(ExitCode::SUCCESS)
        }
        FormSubmission::Blocked => {
            if let Some(form) = page.form() {
                print_field_errors(form.errors())?;
            }
            Ok(ExitCode::FAILURE)
        }
        FormSubmission::Failed | FormSubmission::AwaitingConfirmation => {
            print_notification(page.notification())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `update` subcommand: edit, confirm, apply.
async fn cmd_update(
    client: &MerchantApiClient,
    id: MerchantId,
    fields: MerchantFields,
    yes: bool,
) -> io::Result<ExitCode> {
    let Some(merchant) = load_merchant(client, &id).await? else {
        return Ok(ExitCode::FAILURE);
    };

    let mut page = MerchantsPage::new();
    page.open_edit(merchant);
    if let Some(form) = page.form_mut() {
        fields.apply(form);
    }

    if page.submit_form(client).await != FormSubmission::AwaitingConfirmation {
        if let Some(form) = page.form() {
            print_field_errors(form.errors())?;
        }
        return Ok(ExitCode::FAILURE);
    }

    if let Some(draft) = page.pending_update() {
        let mut out = io::stdout().lock();
        writeln!(out, "{} {}", "Updating".bold(), id.as_str().cyan())?;
        writeln!(out, "  name:  {}", draft.name)?;
        writeln!(out, "  email: {}", draft.email)?;
        writeln!(out, "  phone: {}", draft.phone)?;
        writeln!(out, "  status: {}", draft.status)?;
    }

    if !yes && !confirm("Apply these changes?")? {
        page.cancel_update();
        writeln!(io::stdout().lock(), "{}", "Update cancelled.".dimmed())?;
        return Ok(ExitCode::SUCCESS);
    }

    let spinner = make_spinner("Updating merchant...");
    let updated = page.confirm_update(client).await;
    spinner.finish_and_clear();
    print_notification(page.notification())?;
    Ok(if updated { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes the `delete` subcommand.
async fn cmd_delete(client: &MerchantApiClient, id: MerchantId, yes: bool) -> io::Result<ExitCode> {
    let Some(merchant) = load_merchant(client, &id).await? else {
        return Ok(ExitCode::FAILURE);
    };

    let prompt = format!("Delete {} ({})?", merchant.name, id);
    let mut page = MerchantsPage::new();
    page.request_delete(merchant);
    if !yes && !confirm(&prompt)? {
        page.cancel_delete();
        writeln!(io::stdout().lock(), "{}", "Delete cancelled.".dimmed())?;
        return Ok(ExitCode::SUCCESS);
    }

    let spinner = make_spinner("Deleting merchant...");
    let deleted = page.confirm_delete(client).await;
    spinner.finish_and_clear();
    print_notification(page.notification())?;
    Ok(if deleted { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes the `transactions` subcommand.
async fn cmd_transactions(
    client: &MerchantApiClient,
    settings: &Settings,
    args: TransactionArgs,
) -> io::Result<ExitCode> {
    let id = args
        .merchant
        .map_or_else(|| settings.default_merchant_id.clone(), MerchantId::new);
    let mut query = TransactionQuery::new().page(args.page).size(args.size);
    if let (Some(from), Some(to)) = (args.from, args.to) {
        query = query.date_range(from, to);
    }
    if let Some(status) = args.status {
        query = query.status(status);
    }

    let spinner = make_spinner("Loading transactions...");
    let mut store = TransactionStore::new();
    let outcome = store.load(client, &id, &query).await;
    spinner.finish_and_clear();

    match (outcome, store.data()) {
        (Ok(()), Some(data)) => {
            print_transaction_dashboard(data)?;
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            report(format_args!(
                "Error loading transactions: {}",
                store.error().unwrap_or("unknown error")
            ))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `export` subcommand.
async fn cmd_export(
    client: &MerchantApiClient,
    id: MerchantId,
    page: u32,
    dir: &std::path::Path,
) -> io::Result<ExitCode> {
    let Some(merchant) = load_merchant(client, &id).await? else {
        return Ok(ExitCode::FAILURE);
    };

    let spinner = make_spinner("Loading transactions...");
    let mut details = MerchantDetails::new(merchant);
    details.load(client).await;
    while details.page() < page && details.next_page(client).await {}
    spinner.finish_and_clear();

    if let Some(error) = details.error() {
        report(error)?;
        return Ok(ExitCode::FAILURE);
    }

    match details.export_to_dir(dir, Utc::now().date_naive()) {
        Ok(path) => {
            writeln!(
                io::stdout().lock(),
                "{} {} {}",
                "Exported".green().bold(),
                details.transactions().len(),
                format_args!("transactions to {}", path.display()).dimmed()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report(format_args!("export failed: {err}"))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `watch` subcommand.
async fn cmd_watch(
    client: MerchantApiClient,
    settings: &Settings,
    args: WatchArgs,
) -> io::Result<ExitCode> {
    let id = args
        .merchant
        .map_or_else(|| settings.default_merchant_id.clone(), MerchantId::new);
    let interval = core::time::Duration::from_secs(args.interval.max(1));
    let mut feed = TransactionFeed::spawn(Arc::new(client), id.clone(), interval);
    if let Some(text) = args.search {
        feed.set_search(text);
    }

    let mut updates = feed.subscribe();
    let mut seen = 0_u64;
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.loading || snapshot.polls == seen {
            continue;
        }
        seen = snapshot.polls;

        let mut out = io::stdout().lock();
        writeln!(
            out,
            "{} {} {}",
            "Poll".green().bold(),
            seen,
            format_args!("({} every {}s)", id, interval.as_secs()).dimmed()
        )?;
        drop(out);
        match snapshot.error {
            Some(error) => report(format_args!("{error} (retrying on next poll)"))?,
            None => print_feed_rows(&feed.rows())?,
        }

        if args.polls.is_some_and(|limit| seen >= limit) {
            break;
        }
    }
    feed.stop();
    Ok(ExitCode::SUCCESS)
}

/// Fetches a merchant, printing the error on failure.
async fn load_merchant(client: &MerchantApiClient, id: &MerchantId) -> io::Result<Option<Merchant>> {
    let mut store = MerchantStore::new();
    match store.fetch_merchant(client, id).await {
        Ok(merchant) => Ok(Some(merchant)),
        Err(_) => {
            report(store.error().unwrap_or("failed to load merchant"))?;
            Ok(None)
        }
    }
}

/// Asks a yes/no question on stdin. Anything but `y`/`yes` is a no.
fn confirm(question: &str) -> io::Result<bool> {
    let mut out = io::stdout().lock();
    write!(out, "{} {} ", question.bold(), "[y/N]".dimmed())?;
    out.flush()?;
    drop(out);
    let mut answer = String::new();
    let _read = io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints merchants in a table.
fn print_merchants_table(merchants: &[Merchant]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if merchants.is_empty() {
        writeln!(out, "{}", "No merchants found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Email").fg(Color::Cyan),
        Cell::new("Phone").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Created").fg(Color::Cyan),
    ]);

    for merchant in merchants {
        let id = merchant
            .id
            .as_ref()
            .map_or_else(|| "\u{2014}".to_owned(), ToString::to_string);
        let created = merchant
            .created_at
            .map_or_else(|| "\u{2014}".to_owned(), |at| at.format("%Y-%m-%d").to_string());
        _ = table.add_row(vec![
            Cell::new(id),
            Cell::new(&merchant.name),
            Cell::new(&merchant.email),
            Cell::new(&merchant.phone),
            status_cell(merchant.status),
            Cell::new(created),
        ]);
    }

    writeln!(out, "{table}")?;
    Ok(())
}

/// Colored cell for a merchant status.
fn status_cell(status: MerchantStatus) -> Cell {
    match status {
        MerchantStatus::Active => Cell::new(status).fg(Color::Green),
        MerchantStatus::Inactive => Cell::new(status).fg(Color::DarkGrey),
    }
}

/// Colored cell for a transaction status.
fn txn_status_cell(status: TransactionStatus) -> Cell {
    let color = match status {
        TransactionStatus::Completed => Color::Green,
        TransactionStatus::Pending => Color::Yellow,
        TransactionStatus::Failed => Color::Red,
        TransactionStatus::Reversed => Color::Magenta,
    };
    Cell::new(status).fg(color)
}

/// Prints the details overlay: profile, summary, activity.
fn print_details(details: &MerchantDetails) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let merchant = details.merchant();
    writeln!(out, "{}", "Merchant Profile".green().bold())?;
    let profile = [
        ("ID", merchant.id.as_ref().map(ToString::to_string)),
        ("Name", Some(merchant.name.clone())),
        ("Email", Some(merchant.email.clone())),
        ("Phone", Some(merchant.phone.clone())),
        ("Business", merchant.business_name.clone()),
        ("Registration", merchant.registration_number.clone()),
        ("Address", merchant.address.clone()),
        ("City", merchant.city.clone()),
        ("Country", merchant.country.clone()),
        ("Status", Some(merchant.status.to_string())),
    ];
    for (label, value) in profile {
        writeln!(
            out,
            "  {:<14} {}",
            label.bold(),
            value.unwrap_or_else(|| "\u{2014}".to_owned())
        )?;
    }
    writeln!(out)?;

    if let Some(error) = details.error() {
        writeln!(out, "{} {error}", "error:".red().bold())?;
    } else if let Some(summary) = details.summary() {
        let formatter = CurrencyFormatter::new(&summary.currency);
        writeln!(out, "{}", "Transaction Summary".green().bold())?;
        writeln!(out, "  {:<14} {}", "Total".bold(), summary.total_transactions)?;
        writeln!(out, "  {:<14} {}", "Volume".bold(), formatter.format(summary.total_amount))?;
        for status in TransactionStatus::ALL {
            writeln!(out, "  {:<14} {}", status.as_str(), summary.by_status.get(status))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", "Recent Activity".green().bold())?;
    for event in details.activity_timeline() {
        writeln!(
            out,
            "  {} {}",
            event.date.format("%Y-%m-%d %H:%M").dimmed(),
            event.description
        )?;
    }
    Ok(())
}

/// Prints the transaction dashboard: summary cards and table.
fn print_transaction_dashboard(data: &MerchantTransactions) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let formatter = CurrencyFormatter::new(&data.summary.currency);
    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!("({})", data.merchant_id).dimmed()
    )?;
    writeln!(
        out,
        "  {} {}   {} {}",
        "Total:".bold(),
        data.summary.total_transactions,
        "Volume:".bold(),
        formatter.format(data.summary.total_amount)
    )?;
    let counts: Vec<String> = TransactionStatus::ALL
        .iter()
        .map(|&status| format!("{status}: {}", data.summary.by_status.get(status)))
        .collect();
    writeln!(out, "  {}", counts.join("  "))?;
    writeln!(out)?;

    if data.transactions.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Card").fg(Color::Cyan),
        Cell::new("Acquirer").fg(Color::Cyan),
        Cell::new("Issuer").fg(Color::Cyan),
    ]);
    for txn in &data.transactions {
        let amount = if txn.currency.eq_ignore_ascii_case(formatter.currency()) {
            formatter.format(txn.amount)
        } else {
            CurrencyFormatter::new(&txn.currency).format(txn.amount)
        };
        _ = table.add_row(vec![
            Cell::new(txn.txn_id),
            Cell::new(txn.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(amount),
            txn_status_cell(txn.status),
            Cell::new(format!("{} ****{}", txn.card_type, txn.card_last4)),
            Cell::new(&txn.acquirer),
            Cell::new(&txn.issuer),
        ]);
    }
    writeln!(out, "{table}")?;
    writeln!(
        out,
        "{}",
        format_args!(
            "Page {} of {} ({} transactions)",
            data.pagination.page.saturating_add(1),
            data.pagination.total_pages.max(1),
            data.pagination.total_elements
        )
        .dimmed()
    )?;
    Ok(())
}

/// Prints feed rows in a table.
fn print_feed_rows(rows: &[FeedRow]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if rows.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Time").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Card").fg(Color::Cyan),
        Cell::new("Issuer").fg(Color::Cyan),
    ]);
    for row in rows {
        _ = table.add_row(vec![
            Cell::new(row.txn_id),
            Cell::new(row.timestamp.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&row.amount),
            txn_status_cell(row.status),
            Cell::new(&row.card),
            Cell::new(&row.issuer),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints per-field validation errors.
fn print_field_errors(errors: &FieldErrors) -> io::Result<()> {
    let mut err = io::stderr().lock();
    let fields = [
        ("name", FormField::Name),
        ("email", FormField::Email),
        ("phone", FormField::Phone),
    ];
    for (label, field) in fields {
        if let Some(message) = errors.get(field) {
            writeln!(err, "{} {}: {message}", "invalid:".yellow().bold(), label.bold())?;
        }
    }
    Ok(())
}

/// Prints the page notification, if any.
fn print_notification(notification: Option<&Notification>) -> io::Result<()> {
    let Some(note) = notification else {
        return Ok(());
    };
    match note.kind {
        NotificationKind::Success => {
            writeln!(io::stdout().lock(), "{}", note.message.green().bold())
        }
        NotificationKind::Error => report(&note.message),
    }
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr may itself be gone
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_values() {
        assert_eq!(parse_status("Inactive").unwrap(), MerchantStatus::Inactive);
        assert_eq!(parse_sort_field("createdAt").unwrap(), SortField::CreatedAt);
        assert_eq!(parse_txn_status("REVERSED").unwrap(), TransactionStatus::Reversed);
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_status("closed").is_err());
        assert!(parse_date("29/02/2024").is_err());
    }

    #[test]
    fn list_arguments_parse() {
        let cli = Cli::try_parse_from([
            "merchants", "list", "--size", "20", "--status", "active", "--sort", "email", "--desc",
        ])
        .unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.size, 20);
        assert_eq!(args.status, Some(MerchantStatus::Active));
        assert_eq!(args.sort, SortField::Email);
        assert!(args.desc);
        assert_eq!(args.page, 1);
    }

    #[test]
    fn update_arguments_parse() {
        let cli = Cli::try_parse_from([
            "merchants", "--base-url", "http://127.0.0.1:9/api/v1", "update", "MCH-00003",
            "--city", "Lisbon", "--yes",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:9/api/v1"));
        let Command::Update { id, fields, yes } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(id, "MCH-00003");
        assert_eq!(fields.city.as_deref(), Some("Lisbon"));
        assert!(yes);
    }

    #[test]
    fn fields_apply_to_form() {
        let mut form = MerchantForm::new();
        MerchantFields {
            name: Some("Acme".to_owned()),
            email: Some("ops@acme.test".to_owned()),
            phone: Some("555 0100".to_owned()),
            country: Some(" ".to_owned()),
            status: Some(MerchantStatus::Inactive),
            ..MerchantFields::default()
        }
        .apply(&mut form);
        assert!(form.validate());
        assert_eq!(form.draft().status, MerchantStatus::Inactive);
        assert_eq!(form.draft().country, None);
    }

    #[test]
    fn all_conflicts_with_paging() {
        assert!(Cli::try_parse_from(["merchants", "list", "--all", "--page", "2"]).is_err());
    }
}
