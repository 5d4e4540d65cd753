use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use catalog_client::net::types::Color;
use catalog_client::routes::Route;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Product catalog back-office client")]
pub struct Cli {
    /// API base URL; overrides `CATALOG_API_URL`.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Session file; overrides `CATALOG_SESSION_FILE`.
    #[arg(long)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token.
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CATALOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CATALOG_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        password_confirmation: Option<String>,
    },
    /// Revoke the session token.
    Signout,
    /// Show the signed-in user.
    Whoami,
    /// Resolve a path through the route guards without running it.
    Open { path: String },
    Categories(CategoryCommand),
    Products(ProductCommand),
}

#[derive(Args, Debug)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CategorySubcommand {
    List,
    Show {
        id: Uuid,
    },
    Create {
        #[arg(long)]
        name: String,
    },
    Edit {
        id: Uuid,
        #[arg(long)]
        name: String,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Args, Debug)]
pub struct ProductCommand {
    #[command(subcommand)]
    pub command: ProductSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductSubcommand {
    List,
    Show { id: Uuid },
    Create(ProductFields),
    Edit {
        id: Uuid,
        #[command(flatten)]
        fields: ProductFields,
    },
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
pub struct ProductFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: f64,
    #[arg(long)]
    pub category_id: Uuid,
    /// Repeatable `NAME=#HEX`.
    #[arg(long = "color")]
    pub colors: Vec<Color>,
}

impl Command {
    /// The route this command navigates to.
    pub fn route(&self) -> Route {
        match self {
            Self::Signin { .. } => Route::SignIn,
            Self::Signup { .. } => Route::SignUp,
            Self::Signout | Self::Whoami => Route::Home,
            Self::Open { path } => Route::parse(path),
            Self::Categories(c) => match &c.command {
                CategorySubcommand::List => Route::Categories,
                CategorySubcommand::Show { id } | CategorySubcommand::Delete { id } => Route::Category(*id),
                CategorySubcommand::Create { .. } => Route::NewCategory,
                CategorySubcommand::Edit { id, .. } => Route::EditCategory(*id),
            },
            Self::Products(p) => match &p.command {
                ProductSubcommand::List => Route::Products,
                ProductSubcommand::Show { id } | ProductSubcommand::Delete { id } => Route::Product(*id),
                ProductSubcommand::Create(_) => Route::NewProduct,
                ProductSubcommand::Edit { id, .. } => Route::EditProduct(*id),
            },
        }
    }
}
