//! 命令行客户端：把本地图片上传到解题服务并打印结果

use anyhow::{bail, Context, Result};
use clap::Parser;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;

use question_solver::models::upload::sniff_image_type;

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// 上传试题图片到解题服务，打印识别和解答结果
#[derive(Parser, Debug)]
#[command(name = "solve_client", version, about)]
struct Args {
    /// 图片路径
    image: PathBuf,

    /// 服务地址
    #[arg(default_value = DEFAULT_SERVER)]
    server: String,
}

/// 服务返回 JSON 时格式化输出，否则原样返回
fn render_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("无法读取图片: {}", args.image.display()))?;

    let file_name = args
        .image
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    let mime = sniff_image_type(&bytes).unwrap_or("application/octet-stream");

    println!("📤 上传 {} ({} 字节) 到 {}", file_name, bytes.len(), args.server);

    let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;
    let form = Form::new().part("image", part);

    let response = Client::new()
        .post(format!("{}/api/solve", args.server.trim_end_matches('/')))
        .multipart(form)
        .send()
        .await
        .context("请求解题服务失败")?;

    let status = response.status();
    let body = response.text().await.context("读取服务响应失败")?;

    if body.trim().is_empty() {
        println!("(响应为空)");
    } else {
        println!("{}", render_body(&body));
    }

    if !status.is_success() {
        bail!("服务返回错误状态: {}", status);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_is_pretty_printed() {
        let rendered = render_body(r#"{"error":"图片过大","kind":"file_too_large"}"#);
        assert_eq!(
            rendered,
            "{\n  \"error\": \"图片过大\",\n  \"kind\": \"file_too_large\"\n}"
        );
    }

    #[test]
    fn test_plain_body_is_printed_as_is() {
        let html = "<html><body>502 Bad Gateway</body></html>";
        assert_eq!(render_body(html), html);
        assert_eq!(render_body("Not Found"), "Not Found");
    }

    #[test]
    fn test_args_default_server() {
        let args = Args::try_parse_from(["solve_client", "q.png"]).unwrap();
        assert_eq!(args.image, PathBuf::from("q.png"));
        assert_eq!(args.server, DEFAULT_SERVER);

        let args = Args::try_parse_from(["solve_client", "q.png", "http://host:8080"]).unwrap();
        assert_eq!(args.server, "http://host:8080");

        assert!(Args::try_parse_from(["solve_client"]).is_err());
    }
}
