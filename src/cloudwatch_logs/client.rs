use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs::config::{Credentials, Region};
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::Client;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::{Args, Error, FilterRequest, LogEventsPage, LogEventsSource};

const CREDENTIALS_PROVIDER_NAME: &str = "check-cloudwatch-logs";

/// [LogEventsSource] backed by the AWS SDK. Each call blocks on a current-thread runtime, so the
/// check stays strictly sequential.
pub struct CloudWatchLogsClient {
    runtime: Runtime,
    client: Client,
}

impl CloudWatchLogsClient {
    /// Static credentials are only used when both the key id and the secret are given; otherwise
    /// the SDK's default provider chain applies. The region falls back the same way.
    pub fn new(args: &Args) -> Result<Self, Error> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let (Some(access_key_id), Some(secret_access_key)) =
            (&args.access_key_id, &args.secret_access_key)
        {
            debug!("using static credentials");
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                CREDENTIALS_PROVIDER_NAME,
            ));
        }
        if let Some(region) = &args.region {
            loader = loader.region(Region::new(region.clone()));
        }

        let config = runtime.block_on(loader.load());
        let client = Client::new(&config);

        Ok(Self { runtime, client })
    }
}

impl LogEventsSource for CloudWatchLogsClient {
    fn filter_log_events(&self, request: &FilterRequest) -> Result<LogEventsPage, Error> {
        debug!(
            log_group = %request.log_group_name,
            next_token = ?request.next_token,
            "filtering log events"
        );

        let output = self
            .runtime
            .block_on(
                self.client
                    .filter_log_events()
                    .log_group_name(&request.log_group_name)
                    .filter_pattern(&request.filter_pattern)
                    .start_time(request.start_time)
                    .end_time(request.end_time)
                    .set_next_token(request.next_token.clone())
                    .send(),
            )
            .map_err(|err| Error::Service(DisplayErrorContext(err).to_string()))?;

        Ok(LogEventsPage {
            messages: output
                .events()
                .iter()
                .filter_map(|event| event.message().map(str::to_owned))
                .collect(),
            next_token: output.next_token().map(str::to_owned),
        })
    }
}
