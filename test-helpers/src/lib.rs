pub mod mock;
pub mod routes;
pub mod store;
pub mod telemetry;

use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use payloads::{ClientConfig, requests, responses};
use reqwest::StatusCode;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub use store::{Faults, Store, fake_pdf};

pub struct MockConfig {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
    /// List of allowed CORS origins. Use "*" to allow any origin (development only)
    pub allowed_origins: Vec<String>,
}

impl MockConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        use std::env::var;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(MockConfig {
            ip: var("IP_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: match var("PORT") {
                Ok(port) => port.parse()?,
                Err(_) => 8080,
            },
            allowed_origins,
        })
    }
}

/// Build the mock backend server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub fn build(
    config: &mut MockConfig,
    store: web::Data<Store>,
) -> std::io::Result<Server> {
    let allowed_origins = config.allowed_origins.clone();

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let cors = if allowed_origins.contains(&"*".to_string()) {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .expose_headers(["content-disposition"])
        } else {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .expose_headers(["content-disposition"]);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .wrap(cors)
            .service(routes::api_services())
            .app_data(store.clone())
            .app_data(web::PayloadConfig::new(
                payloads::MAX_UPLOAD_SIZE as usize + 1024 * 1024,
            ))
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct TestApp {
    pub port: u16,
    pub address: String,
    pub client: payloads::APIClient,
    pub store: web::Data<Store>,
}

impl TestApp {
    /// Upload a file through the real multipart endpoint.
    pub async fn upload_pdf(
        &self,
        file_name: &str,
        title: Option<&str>,
        bytes: Vec<u8>,
    ) -> anyhow::Result<responses::Document> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(title) = title {
            form = form.text("title", title.to_string());
        }
        let response = self
            .client
            .inner_client
            .post(self.client.upload_url())
            .multipart(form)
            .send()
            .await?;
        Ok(payloads::api_client::ok_body(response).await?)
    }

    /// Upload one fake PDF per title, oldest first.
    pub async fn seed_documents(
        &self,
        titles: &[&str],
    ) -> anyhow::Result<Vec<responses::Document>> {
        let mut documents = Vec::with_capacity(titles.len());
        for (n, title) in titles.iter().enumerate() {
            let file_name = format!("{}.pdf", title.replace(' ', "_"));
            let document = self
                .upload_pdf(&file_name, Some(title), fake_pdf(n as u32 + 1))
                .await?;
            documents.push(document);
        }
        Ok(documents)
    }

    pub async fn create_summary(
        &self,
        document: &responses::Document,
        details: requests::GenerateSummary,
    ) -> anyhow::Result<responses::Summary> {
        Ok(self.client.generate_summary(&document.id, &details).await?)
    }

    pub fn set_faults(&self, faults: Faults) {
        self.store.set_faults(faults);
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let store = web::Data::new(Store::default());
    let mut config = MockConfig {
        ip: "127.0.0.1".into(),
        port,
        allowed_origins: vec!["*".to_string()],
    };

    let server = build(&mut config, store.clone()).unwrap();
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{}", config.port);
    TestApp {
        port: config.port,
        client: payloads::APIClient::new(ClientConfig::new(address.clone())),
        address,
        store,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}
