use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        ["reqwest=info", "hyper=info", "alloy_transport=info", "alloy_rpc_client=info"]
            .into_iter()
            .fold(EnvFilter::new("debug"), |filter, directive| {
                filter.add_directive(
                    directive
                        .parse()
                        .expect("assert: can parse env filter directive"),
                )
            })
    });

    let format = fmt::format()
        .with_timer(fmt::time::time())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::Layer::default()
                .with_writer(std::io::stdout)
                .event_format(format),
        )
        .init();
}
