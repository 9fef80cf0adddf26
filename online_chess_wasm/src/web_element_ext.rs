use crate::web_document::web_document;
use crate::web_error_handling::JsResult;


pub trait WebElementExt {
    fn with_id(self, value: &str) -> web_sys::Element;
    fn with_text_content(self, text: &str) -> web_sys::Element;
    fn with_attribute(self, name: &str, value: &str) -> JsResult<web_sys::Element>;
    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element>;

    fn set_class_enabled(&self, class: &str, enabled: bool) -> JsResult<()>;

    // Places a unit-sized SVG element at the top-left corner `(x, y)`.
    fn set_square_position(&self, pos: (f64, f64)) -> JsResult<()>;

    fn remove_all_children(&self);
    fn append_new_svg_element(&self, local_name: &str) -> JsResult<web_sys::Element>;
}

impl WebElementExt for web_sys::Element {
    fn with_id(self, value: &str) -> web_sys::Element {
        self.set_id(value);
        self
    }

    fn with_text_content(self, text: &str) -> web_sys::Element {
        self.set_text_content(Some(text));
        self
    }

    fn with_attribute(self, name: &str, value: &str) -> JsResult<web_sys::Element> {
        self.set_attribute(name, value)?;
        Ok(self)
    }

    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element> {
        for class in classes {
            self.class_list().add_1(class)?;
        }
        Ok(self)
    }

    fn set_class_enabled(&self, class: &str, enabled: bool) -> JsResult<()> {
        self.class_list().toggle_with_force(class, enabled)?;
        Ok(())
    }

    fn set_square_position(&self, pos: (f64, f64)) -> JsResult<()> {
        let (x, y) = pos;
        self.set_attribute("x", &x.to_string())?;
        self.set_attribute("y", &y.to_string())?;
        self.set_attribute("width", "1")?;
        self.set_attribute("height", "1")?;
        Ok(())
    }

    fn remove_all_children(&self) { self.replace_children_with_node_0() }

    fn append_new_svg_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        let node = web_document()?.create_svg_element(local_name)?;
        self.append_child(&node)?;
        Ok(node)
    }
}
