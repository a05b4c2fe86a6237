use anyhow::Context;
use chrono::Local;
use clap::Parser;
use pricing_desk::adapters::http::{
    AuthService, OperatorService, PriceEntryService, RouteService, SeasonService,
};
use pricing_desk::app::screens::{
    NoticeBoard, NoticeKind, OperatorForm, OperatorScope, OperatorScreen, PricingScreen,
    RouteForm, RouteScreen, SaveOutcome, SeasonForm, SeasonScreen,
};
use pricing_desk::config::cli::{
    Command, GridArgs, OperatorCommand, PriceCommand, RouteCommand, SeasonCommand,
};
use pricing_desk::core::calendar::YearMonth;
use pricing_desk::core::export::ExportSheet;
use pricing_desk::core::season::derive_season;
use pricing_desk::domain::model::{
    LoginRequest, ListPayload, PriceEntry, PriceEntryUpsert, PriceQuery, RegisterRequest,
};
use pricing_desk::utils::error::{DeskError, ErrorSeverity};
use pricing_desk::utils::{logger, validation::Validate};
use pricing_desk::{ApiClient, CliConfig, LocalStorage, Session, SessionContext, Settings};
use std::io::{BufRead, Write};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Config file: {:?}", cli.config);

    if let Err(e) = run(cli).await {
        let Some(desk_error) = e.downcast_ref::<DeskError>() else {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        };

        tracing::error!(
            "❌ Command failed: {:#} (Category: {:?}, Severity: {:?})",
            e,
            desk_error.category(),
            desk_error.severity()
        );
        eprintln!("❌ {}", desk_error.user_friendly_message());
        eprintln!("💡 {}", desk_error.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match desk_error.severity() {
            ErrorSeverity::Low => 1,      // 輸入錯誤
            ErrorSeverity::Medium => 2,   // 伺服器或網路，可重試
            ErrorSeverity::High => 3,     // 設定錯誤
            ErrorSeverity::Critical => 4, // 檔案系統
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let settings = cli.settings()?;
    settings.validate()?;

    let mut session = SessionContext::new(LocalStorage::new(settings.session_dir.clone()));
    if let Some(current) = session.init().await {
        tracing::debug!("Restored session for role {}", current.role);
    }

    let client =
        ApiClient::from_config(&settings)?.with_token(session.token().map(str::to_string));

    match cli.command {
        Command::Login { email, password } => login(&client, &mut session, email, password).await,
        Command::Register {
            email,
            password,
            role,
        } => {
            let message = AuthService::new(client)
                .register(&RegisterRequest {
                    email,
                    password,
                    role,
                })
                .await?;
            println!("✅ {}", message);
            Ok(())
        }
        Command::Logout => {
            session.clear().await?;
            println!("👋 Signed out");
            Ok(())
        }
        Command::Whoami => {
            whoami(session.current());
            Ok(())
        }
        Command::Routes(cmd) => routes(cmd, &client).await,
        Command::Seasons(cmd) => seasons(cmd, &client).await,
        Command::Operators(cmd) => operators(cmd, &client, session.current()).await,
        Command::Prices(cmd) => prices(cmd, &client, &settings, &session).await,
    }
}

async fn login(
    client: &ApiClient,
    session: &mut SessionContext<LocalStorage>,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let response = AuthService::new(client.clone())
        .login(&LoginRequest { email, password })
        .await?;

    let new_session = Session::from_auth_response(&response);
    if new_session.token.is_empty() {
        return Err(DeskError::NotAuthenticated).context("login response carried no token");
    }

    let role = new_session.role.clone();
    session.save(new_session).await?;
    println!("✅ Signed in as {}", role);
    Ok(())
}

fn whoami(current: Option<&Session>) {
    match current {
        Some(s) => {
            println!("Role:        {}", s.role);
            println!("User id:     {}", s.user_id.as_deref().unwrap_or("-"));
            println!(
                "Operator id: {}",
                s.operator_id.map_or("-".to_string(), |id| id.to_string())
            );
        }
        None => println!("Not signed in"),
    }
}

/// 刪除前的 [y/N] 確認；--yes 時直接通過
fn confirm_with(assume_yes: bool) -> impl Fn(&str) -> bool {
    move |prompt: &str| {
        if assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

fn show_notice(notices: &NoticeBoard) {
    if let Some(notice) = notices.active() {
        match notice.kind {
            NoticeKind::Info => println!("✅ {}", notice.message),
            NoticeKind::Error => eprintln!("⚠️  {}", notice.message),
        }
    }
}

async fn routes(cmd: RouteCommand, client: &ApiClient) -> anyhow::Result<()> {
    let mut screen = RouteScreen::new(
        RouteService::new(client.clone()),
        SeasonService::new(client.clone()),
    );

    let result = match cmd {
        RouteCommand::List => screen.refresh_routes().await.map(|_| {
            for route in screen.routes() {
                println!(
                    "{}\t{}\t[{}]\tseason {}",
                    route.id,
                    route.label(),
                    RouteScreen::booking_class_names(route),
                    route.season_id.map_or("-".to_string(), |id| id.to_string())
                );
            }
        }),
        RouteCommand::Seasons { year } => screen.load_seasons().await.map(|_| {
            let years: Vec<String> = screen.years().iter().map(|y| y.to_string()).collect();
            println!("Years: {}", years.join(", "));
            for season in screen.seasons_for_year(year) {
                println!("{}\t{}", season.id, season.name);
            }
        }),
        RouteCommand::Create {
            origin,
            destination,
            classes,
            season_id,
        } => {
            let form = RouteForm {
                origin,
                destination,
                booking_class_names: classes,
                season_id,
            };
            screen.save(&form, None).await
        }
        RouteCommand::Update {
            id,
            origin,
            destination,
            classes,
            season_id,
        } => {
            screen.refresh_routes().await?;
            let existing = screen
                .routes()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| DeskError::ValidationError {
                    message: format!("Route {} not found", id),
                })?;
            let form = RouteForm {
                origin: origin.unwrap_or(existing.origin),
                destination: destination.unwrap_or(existing.destination),
                booking_class_names: classes.unwrap_or_else(|| {
                    existing
                        .booking_classes
                        .iter()
                        .map(|c| c.name.clone())
                        .collect()
                }),
                season_id: season_id.or(existing.season_id),
            };
            screen.save(&form, Some(id)).await
        }
        RouteCommand::Delete { id, yes } => {
            let confirm = confirm_with(yes);
            screen.delete(id, &confirm).await.map(|deleted| {
                if !deleted {
                    println!("Cancelled");
                }
            })
        }
        RouteCommand::BookingClasses { id } => screen.booking_classes(id).await.map(|classes| {
            for class in classes {
                println!("{}\t{}", class.id, class.name);
            }
        }),
    };

    show_notice(screen.notices());
    Ok(result?)
}

async fn seasons(cmd: SeasonCommand, client: &ApiClient) -> anyhow::Result<()> {
    let mut screen = SeasonScreen::new(SeasonService::new(client.clone()));

    let result = match cmd {
        SeasonCommand::List => screen.fetch().await.map(|_| {
            for season in screen.seasons() {
                println!(
                    "{}\t{}\t{} .. {}",
                    season.id, season.name, season.start, season.end
                );
            }
        }),
        SeasonCommand::Create { year, season_type } => screen
            .submit(SeasonForm { year, season_type }, None)
            .await
            .map(|season| println!("✅ Created {}", season.name)),
        SeasonCommand::Update {
            id,
            year,
            season_type,
        } => screen
            .submit(SeasonForm { year, season_type }, Some(id))
            .await
            .map(|season| println!("✅ Updated {}", season.name)),
        SeasonCommand::Delete { id, yes } => {
            // 先載入清單，確認訊息才有季節名稱
            screen.fetch().await?;
            let confirm = confirm_with(yes);
            screen.delete(id, &confirm).await.map(|deleted| {
                println!("{}", if deleted { "🗑️ Deleted" } else { "Cancelled" });
            })
        }
        SeasonCommand::Derive { year, season_type } => {
            let derived = derive_season(year, season_type).ok_or_else(|| {
                DeskError::ValidationError {
                    message: format!("{} is not a supported year", year),
                }
            })?;
            println!("{}\t{} .. {}", derived.name, derived.start, derived.end);
            Ok(())
        }
    };

    show_notice(screen.notices());
    Ok(result?)
}

async fn operators(
    cmd: OperatorCommand,
    client: &ApiClient,
    session: Option<&Session>,
) -> anyhow::Result<()> {
    let mut screen = OperatorScreen::new(
        OperatorService::new(client.clone()),
        SeasonService::new(client.clone()),
        OperatorScope::for_session(session),
    );

    let result = match cmd {
        OperatorCommand::List => screen.fetch().await.map(|_| {
            for op in screen.operators() {
                println!(
                    "{}\t{}\t{}\t[{}]",
                    op.id,
                    op.name,
                    op.email,
                    OperatorScreen::booking_class_names(op)
                );
            }
        }),
        OperatorCommand::Create {
            name,
            email,
            password,
            booking_class_ids,
            season_ids,
        } => {
            let form = OperatorForm {
                name,
                email,
                password,
                booking_class_ids,
                season_ids,
            };
            screen.submit(&form, None).await
        }
        OperatorCommand::Update {
            id,
            name,
            email,
            booking_class_ids,
            season_ids,
        } => {
            screen.fetch().await?;
            let existing = screen
                .operators()
                .iter()
                .find(|o| o.id == id)
                .map(OperatorScreen::form_for)
                .ok_or_else(|| DeskError::ValidationError {
                    message: format!("Operator {} not found", id),
                })?;
            if let Some(ids) = &season_ids {
                screen.load_seasons().await?;
                let unknown: Vec<i64> = ids
                    .iter()
                    .copied()
                    .filter(|sid| !screen.seasons().iter().any(|s| s.id == *sid))
                    .collect();
                if !unknown.is_empty() {
                    tracing::warn!("Unknown season ids {:?} will be sent as given", unknown);
                }
            }
            let form = OperatorForm {
                name: name.unwrap_or(existing.name),
                email: email.unwrap_or(existing.email),
                password: String::new(),
                booking_class_ids: booking_class_ids.unwrap_or(existing.booking_class_ids),
                season_ids: season_ids.unwrap_or(existing.season_ids),
            };
            screen.submit(&form, Some(id)).await
        }
        OperatorCommand::Delete { id, yes } => {
            screen.fetch().await?;
            let confirm = confirm_with(yes);
            screen.delete(id, &confirm).await.map(|deleted| {
                println!("{}", if deleted { "🗑️ Deleted" } else { "Cancelled" });
            })
        }
    };

    show_notice(screen.notices());
    Ok(result?)
}

async fn open_grid(
    client: &ApiClient,
    tour_operator_id: &str,
    grid: &GridArgs,
) -> anyhow::Result<PricingScreen<PriceEntryService>> {
    let month = grid
        .month
        .unwrap_or_else(|| YearMonth::of(Local::now().date_naive()));
    let mut screen = PricingScreen::new(
        PriceEntryService::new(client.clone()),
        tour_operator_id,
        month,
    )
    .with_selection(grid.route_id, grid.season_id);

    let loaded = screen.load_reference_data().await;
    show_notice(screen.notices());
    loaded?;
    Ok(screen)
}

fn print_sheet(sheet: &ExportSheet) {
    println!("{}", sheet.headers.join("\t"));
    for row in &sheet.rows {
        let cells: Vec<String> = row.iter().map(|c| c.as_plain()).collect();
        println!("{}", cells.join("\t"));
    }
}

fn print_entry(entry: &PriceEntry) {
    println!(
        "{}\t{}\t{}\troute {}\tclass {}\t{}\t{} seats",
        entry.id,
        entry.date,
        entry.day_of_week,
        entry.route_name.clone().unwrap_or_else(|| entry.route_id.to_string()),
        entry
            .booking_class_name
            .clone()
            .unwrap_or_else(|| entry.booking_class_id.to_string()),
        entry.price,
        entry.seat_count
    );
}

async fn prices(
    cmd: PriceCommand,
    client: &ApiClient,
    settings: &Settings,
    session: &SessionContext<LocalStorage>,
) -> anyhow::Result<()> {
    let operator_id = session.user_id().unwrap_or_default().to_string();

    match cmd {
        PriceCommand::Show(grid) => {
            let screen = open_grid(client, &operator_id, &grid).await?;
            if screen.days().is_empty() {
                println!("No days of {} fall inside the selected season", screen.selected_month());
                return Ok(());
            }
            print_sheet(&screen.export_sheet());
        }
        PriceCommand::Set { grid, cells } => {
            if operator_id.is_empty() {
                return Err(DeskError::NotAuthenticated)
                    .context("saving prices needs a signed-in user id");
            }
            let mut screen = open_grid(client, &operator_id, &grid).await?;
            for cell in &cells {
                screen
                    .apply_cell(cell)
                    .with_context(|| format!("cell {}:{}", cell.date, cell.class_id))?;
            }

            let outcome = screen.save_all().await;
            show_notice(screen.notices());
            if let SaveOutcome::Saved(count) = outcome? {
                tracing::info!("💾 Saved {} entries for {}", count, screen.selected_month());
            }
        }
        PriceCommand::Export(grid) => {
            let format = settings.format()?;
            let screen = open_grid(client, &operator_id, &grid).await?;
            let storage = LocalStorage::new(settings.output_path.clone());
            let file_name = screen.export(&storage, format).await?;
            println!("📁 Output saved to: {}", storage.full_path(&file_name).display());
        }
        PriceCommand::Query {
            operator_id,
            route_id,
            season_id,
            from,
            to,
            page,
            page_size,
        } => {
            let query = PriceQuery {
                operator_id,
                route_id,
                season_id,
                from,
                to,
                page,
                page_size,
            };
            match PriceEntryService::new(client.clone()).query_page(&query).await? {
                ListPayload::Page(page) => {
                    page.items.iter().for_each(print_entry);
                    println!(
                        "Page {} ({} per page), {} entries in total",
                        page.page, page.page_size, page.total
                    );
                }
                ListPayload::Items(items) => items.iter().for_each(print_entry),
            }
        }
        PriceCommand::Add {
            route_id,
            season_id,
            booking_class_id,
            date,
            price,
            seats,
        } => {
            if operator_id.is_empty() {
                return Err(DeskError::NotAuthenticated)
                    .context("creating prices needs a signed-in user id");
            }
            let created = PriceEntryService::new(client.clone())
                .create(&PriceEntryUpsert {
                    route_id,
                    season_id,
                    tour_operator_id: operator_id,
                    booking_class_id,
                    date,
                    price,
                    seat_count: seats,
                })
                .await?;
            match created {
                Some(entry) => println!("✅ Created price entry {}", entry.id),
                None => println!("✅ Created price entry"),
            }
        }
    }

    Ok(())
}
