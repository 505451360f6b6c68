/// Melody Server - music streaming REST backend
use clap::{Parser, Subcommand};
use melody_core::{storage::StorageContext, validation, CreateUser, Role};
use melody_server::{
    config::ServerConfig,
    create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use melody_storage::LocalStorageContext;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "melody-server")]
#[command(about = "Melody music streaming server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml)
    #[arg(short, long, global = true, env = "MELODY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Login email
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(short, long)]
        date_of_birth: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "melody_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config)?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser {
            email,
            password,
            name,
            date_of_birth,
            admin,
        } => {
            let role = if admin { Role::Admin } else { Role::User };
            add_user(&config, email, &password, name, &date_of_birth, role).await?;
        }
        Commands::ListUsers => {
            list_users(&config).await?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Melody Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let db = Arc::new(LocalStorageContext::open(&config.storage.database_url).await?);
    tracing::info!("Database connected");

    // Initialize file storage
    let file_storage = FileStorage::new(config.storage.upload_path.clone());
    file_storage.initialize().await?;
    tracing::info!("File storage initialized at {:?}", file_storage.base_path());

    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.bcrypt_cost,
    ));

    let app_state = AppState::new(
        db,
        auth_service,
        Arc::new(file_storage),
        config.streaming.chunk_size,
    );
    let app = create_router(app_state, config.storage.max_upload_bytes);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config: &ServerConfig,
    email: String,
    password: &str,
    name: String,
    date_of_birth: &str,
    role: Role,
) -> anyhow::Result<()> {
    validation::validate_email(&email)?;
    validation::validate_password(password)?;
    validation::validate_display_name(&name)?;
    let date_of_birth = validation::normalize_date_of_birth(date_of_birth)?;

    let db = LocalStorageContext::open(&config.storage.database_url).await?;
    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.bcrypt_cost,
    );

    let user = db
        .create_user(CreateUser {
            email,
            password_hash: auth_service.hash_password(password)?,
            name,
            date_of_birth,
            role,
        })
        .await?;

    tracing::info!(user_id = user.id, role = %user.role, "Created user {}", user.email);
    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let db = LocalStorageContext::open(&config.storage.database_url).await?;
    let users = db.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}> [{}]", user.id, user.name, user.email, user.role);
    }

    Ok(())
}
