use clap::Parser;

mod cli {
    use clap::{Parser, Subcommand};

    #[derive(Parser)]
    #[command(
        name = "dealership manager",
        about = "Cli tool for managing state of dealership services including: postgres and the media bucket"
    )]
    pub(crate) struct Args {
        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Subcommand)]
    pub(crate) enum Command {
        Postgres {
            #[clap(subcommand)]
            cmd: PostgresCommand,
        },
        Bucket {
            #[clap(subcommand)]
            cmd: BucketCommand,
        },
    }

    #[derive(Subcommand)]
    pub(crate) enum PostgresCommand {
        Migrate,
        RevertAll,
        Redo,
    }

    #[derive(Subcommand)]
    pub(crate) enum BucketCommand {
        CreateAbsent,
        Delete,
    }
}

mod postgres {
    use common::persistence::PG_POOL;
    use diesel_async::AsyncMigrationHarness;
    use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

    pub const PG_MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/persistence/migrations");

    pub(crate) async fn migrate() {
        println!("Running migrations");
        let conn = PG_POOL.get().await.expect("failed to get pg connection");
        let mut harness = AsyncMigrationHarness::new(conn);
        harness
            .run_pending_migrations(PG_MIGRATIONS)
            .expect("failed to run migrations");
        println!("Database migrated")
    }

    pub(crate) async fn revert_all() {
        println!("Reverting all migrations");
        let conn = PG_POOL.get().await.expect("failed to get pg connection");
        let mut harness = AsyncMigrationHarness::new(conn);
        harness
            .revert_all_migrations(PG_MIGRATIONS)
            .expect("failed to revert migrations");
        println!("Database reverted")
    }

    pub(crate) async fn redo() {
        println!("Redoing all migrations");
        let conn = PG_POOL.get().await.expect("failed to get pg connection");
        let mut harness = AsyncMigrationHarness::new(conn);
        harness
            .revert_all_migrations(PG_MIGRATIONS)
            .expect("failed to revert migrations");
        harness
            .run_pending_migrations(PG_MIGRATIONS)
            .expect("failed to run migrations");
        println!("Database redone")
    }
}

mod bucket {
    use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
    use common::bucket::S3_CLIENT;
    use common::config::CONFIG;

    pub(crate) async fn create_absent_bucket() {
        let name = CONFIG.bucket.name.as_str();
        println!("Creating absent bucket `{name}`");
        let bucket_list_response = S3_CLIENT
            .list_buckets()
            .send()
            .await
            .expect("failed to list buckets");

        let exists = bucket_list_response
            .buckets()
            .iter()
            .any(|b| b.name() == Some(name));
        if exists {
            println!("Bucket already exists");
            return;
        }

        S3_CLIENT
            .create_bucket()
            .bucket(name)
            .create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(
                        CONFIG.bucket.region.as_str(),
                    ))
                    .build(),
            )
            .send()
            .await
            .expect("failed to create bucket");
        println!("Bucket created");
    }

    pub(crate) async fn delete_bucket() {
        let name = CONFIG.bucket.name.as_str();
        println!("Deleting bucket `{name}`");
        S3_CLIENT
            .delete_bucket()
            .bucket(name)
            .send()
            .await
            .expect("failed to delete bucket");
        println!("Bucket deleted");
    }
}

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    match args.command {
        cli::Command::Postgres { cmd } => dispatch_postgres(cmd).await,
        cli::Command::Bucket { cmd } => dispatch_bucket(cmd).await,
    }
}

async fn dispatch_postgres(cmd: cli::PostgresCommand) {
    match cmd {
        cli::PostgresCommand::Migrate => postgres::migrate().await,
        cli::PostgresCommand::RevertAll => postgres::revert_all().await,
        cli::PostgresCommand::Redo => postgres::redo().await,
    };
}

async fn dispatch_bucket(cmd: cli::BucketCommand) {
    match cmd {
        cli::BucketCommand::CreateAbsent => bucket::create_absent_bucket().await,
        cli::BucketCommand::Delete => bucket::delete_bucket().await,
    }
}
