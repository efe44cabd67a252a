#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub age: i32,
}
