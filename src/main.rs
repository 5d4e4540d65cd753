mod cli;

use std::process::ExitCode;

use clap::Parser;

use catalog_client::app::App;
use catalog_client::config::{ClientConfig, ConfigError};
use catalog_client::net::types::{ApiError, CategoryInput, Credentials, ProductInput, Registration};
use catalog_client::routes::Route;
use catalog_client::routes::guard::Navigation;
use catalog_client::services::auth::{AuthError, SignOutOutcome};
use catalog_client::views;

use cli::{CategorySubcommand, Cli, Command, ProductFields, ProductSubcommand};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("redirected to {0}")]
    Redirected(Route),
    #[error("page not found")]
    NotFound,
}

impl CliError {
    fn messages(&self) -> Vec<String> {
        match self {
            Self::Api(e) => e.display_messages(),
            Self::Auth(e) => e.display_messages(),
            Self::Redirected(Route::SignIn) => vec!["You need to sign in first (see `catalog signin`).".to_owned()],
            other => vec![other.to_string()],
        }
    }

    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Redirected(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    if let Err(e) = catalog_client::logging::try_init() {
        eprintln!("logging init failed: {e}");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}", views::render_errors(&e.messages()));
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url.trim().trim_end_matches('/').to_owned();
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let app = App::from_config(&config)?;
    if let Err(e) = app.auth.restore().await {
        tracing::warn!(error = %e, "could not load profile for persisted session");
    }

    let route = cli.command.route();
    match app.navigate_loaded(route).await {
        Navigation::Render(Route::NotFound) => return Err(CliError::NotFound),
        Navigation::Render(_) => {}
        Navigation::Redirect(target) => return Err(CliError::Redirected(target)),
        Navigation::Pending => return Err(CliError::Redirected(Route::Categories)),
    }

    execute(&app, cli.command).await
}

async fn execute(app: &App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Signin { email, password } => {
            let profile = app.auth.sign_in(&Credentials { email, password }).await?;
            println!("Signed in as {}", views::render_user(profile.as_ref()));
        }
        Command::Signup { name, email, password, password_confirmation } => {
            let password_confirmation = password_confirmation.unwrap_or_else(|| password.clone());
            let registration = Registration { name, email, password, password_confirmation };
            let profile = app.auth.sign_up(&registration).await?;
            println!("Account created; signed in as {}", views::render_user(profile.as_ref()));
        }
        Command::Signout => match app.auth.sign_out().await? {
            SignOutOutcome::SignedOut | SignOutOutcome::AlreadySignedOut => println!("Signed out."),
            SignOutOutcome::ClearedWithoutAcknowledgement => {
                println!("Signed out locally; the server did not confirm.");
            }
            SignOutOutcome::Superseded => println!("Previous session ended; a newer session is still signed in."),
        },
        Command::Whoami => {
            let profile = app.auth.load_profile().await?;
            println!("{}", views::render_user(profile.as_ref()));
        }
        Command::Open { path } => println!("{}", Route::parse(&path)),
        Command::Categories(c) => categories(app, c.command).await?,
        Command::Products(p) => products(app, p.command).await?,
    }
    Ok(())
}

async fn categories(app: &App, command: CategorySubcommand) -> Result<(), ApiError> {
    match command {
        CategorySubcommand::List => print!("{}", views::render_categories(&app.catalog.list_categories().await?)),
        CategorySubcommand::Show { id } => {
            let category = app.catalog.get_category(id).await?;
            print!("{}", views::render_category(&category, app.show_admin_controls()));
        }
        CategorySubcommand::Create { name } => {
            let category = app.catalog.create_category(&CategoryInput { name }).await?;
            println!("Created {}", Route::Category(category.id));
        }
        CategorySubcommand::Edit { id, name } => {
            let category = app.catalog.update_category(id, &CategoryInput { name }).await?;
            println!("Updated {}", Route::Category(category.id));
        }
        CategorySubcommand::Delete { id } => {
            app.catalog.delete_category(id).await?;
            println!("Deleted category {id}");
        }
    }
    Ok(())
}

async fn products(app: &App, command: ProductSubcommand) -> Result<(), ApiError> {
    match command {
        ProductSubcommand::List => print!("{}", views::render_products(&app.catalog.list_products().await?)),
        ProductSubcommand::Show { id } => print!("{}", views::render_product(&app.catalog.get_product(id).await?)),
        ProductSubcommand::Create(fields) => {
            let product = app.catalog.create_product(&product_input(fields)).await?;
            println!("Created {}", Route::Product(product.id));
        }
        ProductSubcommand::Edit { id, fields } => {
            let product = app.catalog.update_product(id, &product_input(fields)).await?;
            println!("Updated {}", Route::Product(product.id));
        }
        ProductSubcommand::Delete { id } => {
            app.catalog.delete_product(id).await?;
            println!("Deleted product {id}");
        }
    }
    Ok(())
}

fn product_input(fields: ProductFields) -> ProductInput {
    ProductInput {
        name: fields.name,
        description: fields.description,
        price: fields.price,
        category_id: fields.category_id,
        colors: ProductInput::colors_from(&fields.colors),
    }
}
