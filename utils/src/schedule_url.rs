/// Endpoint that schedules a run of `pipeline_name` on a GoCD server.
///
/// The pipeline name is inserted verbatim, without percent-encoding.
pub fn build_schedule_url(server_url: &str, pipeline_name: &str) -> String {
    format!(
        "{}/go/api/pipelines/{}/schedule",
        server_url.trim_end_matches('/'),
        pipeline_name
    )
}
