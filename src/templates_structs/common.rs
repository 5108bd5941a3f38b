use askama::Template;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub app_name: String,
    pub errors: Vec<String>,
    pub flash: Option<String>,
    pub email: String,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub app_name: String,
    pub errors: Vec<String>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub csrf_token: String,
}
