//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Route label for metrics
///
/// Uses the matched resource pattern so ids in the path do not explode
/// label cardinality; unmatched requests share one label.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unmatched".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_unmatched_request() {
        let req = TestRequest::with_uri("/nope/42").to_http_request();
        assert_eq!(extract_route_pattern(&req), "/unmatched");
    }
}
