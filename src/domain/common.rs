/// Label shown to the user for a value.
pub trait Displayable {
    fn display_label(&self) -> String;
}
