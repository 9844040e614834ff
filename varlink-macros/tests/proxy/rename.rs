#[test]
fn rename_compiles() {
    use serde::{Deserialize, Serialize};
    use varlink::proxy;

    #[proxy("org.example.Rename")]
    #[allow(dead_code)]
    trait RenameProxy {
        #[varlink(rename = "GetData")]
        async fn get_data(&mut self) -> varlink::Result<Result<String, Error>>;

        #[varlink(rename = "SetValue")]
        async fn update_value(&mut self, value: i32) -> varlink::Result<Result<(), Error>>;

        // Test snake_case to PascalCase conversion
        async fn snake_case_method(&mut self) -> varlink::Result<Result<(), Error>>;
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Error;
}
