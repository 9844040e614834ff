#[test]
fn basic_compiles() {
    use serde::{Deserialize, Serialize};
    use varlink::proxy;

    #[proxy("org.example.Basic")]
    #[allow(dead_code)]
    trait BasicProxy {
        async fn get_value(&mut self, key: &str) -> varlink::Result<Result<String, BasicError>>;
        async fn set_value(
            &mut self,
            key: &str,
            value: &str,
        ) -> varlink::Result<Result<(), BasicError>>;
        async fn ping(&mut self) -> varlink::Result<Result<(), BasicError>>;
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "error")]
    enum BasicError {
        NotFound,
        InvalidKey,
    }
}
