use clap::{Parser, Subcommand};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::process::ExitCode;
use url::Url;

#[derive(Parser)]
#[command(name = "directory-cli")]
#[command(about = "Command-line client for the employee directory service", long_about = None)]
struct Cli {
    /// Base URL of a running employee-directory server.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every employee
    List,
    /// Search employees by name fragment
    Search { term: String },
    /// Show one employee
    Get { id: String },
    /// Print the highest salary
    HighestSalary,
    /// Print the names of the ten best paid employees
    TopTen,
    /// Create an employee
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        salary: u64,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        profile_image: Option<String>,
    },
    /// Delete an employee
    Delete { id: String },
}

impl Commands {
    fn request(&self) -> (Method, Vec<&str>, Option<Value>) {
        match self {
            Commands::List => (Method::GET, vec![], None),
            Commands::Search { term } => (Method::GET, vec!["search", term.as_str()], None),
            Commands::Get { id } => (Method::GET, vec![id.as_str()], None),
            Commands::HighestSalary => (Method::GET, vec!["highestSalary"], None),
            Commands::TopTen => (Method::GET, vec!["topTenHighestEarningEmployeeNames"], None),
            Commands::Create {
                name,
                salary,
                age,
                profile_image,
            } => {
                let mut body = json!({ "name": name, "salary": salary, "age": age });
                if let Some(image) = profile_image {
                    body["profile_image"] = json!(image);
                }
                (Method::POST, vec![], Some(body))
            }
            Commands::Delete { id } => (Method::DELETE, vec![id.as_str()], None),
        }
    }
}

fn endpoint(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{base} cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(["api", "v1"])
        .extend(segments);
    Ok(url)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let (method, segments, body) = cli.command.request();
    let mut request = client.request(method, endpoint(&cli.url, &segments)?);
    if let Some(body) = body {
        request = request.json(&body);
    }

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Error: server returned status {}", status);
        eprintln!("{}", rendered);
        Ok(if status == StatusCode::NOT_FOUND {
            ExitCode::from(2)
        } else {
            ExitCode::FAILURE
        })
    }
}
