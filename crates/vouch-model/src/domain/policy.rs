/// Policy name granted to an application: its id without the leading `/`.
pub fn policy_name(app_id: &str) -> String {
    app_id.strip_prefix('/').unwrap_or(app_id).to_string()
}
